//! Invite ledger: single-use registration codes.

use rand_core::{OsRng, RngCore};

use crate::{
  Error, Result,
  error::Conflict,
  invite::Invite,
  store::WishStore,
};

/// Random bytes per generated code; rendered as twice as many hex digits.
const CODE_BYTES: usize = 6;

/// Attempts at finding an unissued code before giving up.
const ISSUE_ATTEMPTS: usize = 8;

pub struct InviteLedger<'a, S> {
  store: &'a S,
}

impl<'a, S> InviteLedger<'a, S>
where
  S: WishStore,
{
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// A code is consumable iff exactly one live, unused row carries it.
  pub async fn is_consumable(&self, code: &str) -> Result<bool> {
    let count = self
      .store
      .count_consumable_invites(code.to_owned())
      .await
      .map_err(Error::store)?;
    Ok(count == 1)
  }

  /// Spend `code`. Exactly one concurrent caller can succeed; everyone else,
  /// and anyone presenting an unknown or used code, gets
  /// [`Conflict::InvalidInvite`].
  pub async fn consume(&self, code: &str) -> Result<()> {
    let changed = self
      .store
      .consume_invite(code.to_owned())
      .await
      .map_err(Error::store)?;
    if changed == 1 { Ok(()) } else { Err(Conflict::InvalidInvite.into()) }
  }

  /// Issue a fresh random code.
  pub async fn issue(&self) -> Result<Invite> {
    for _ in 0..ISSUE_ATTEMPTS {
      let inserted = self
        .store
        .insert_invite(generate_code())
        .await
        .map_err(Error::store)?;
      if let Some(invite) = inserted {
        return Ok(invite);
      }
    }
    Err(Error::Store("could not find an unused invite code".into()))
  }
}

/// Uppercase hex drawn from the OS RNG, e.g. `"9F03A1C27B4E"`.
pub fn generate_code() -> String {
  let mut bytes = [0u8; CODE_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode_upper(bytes)
}
