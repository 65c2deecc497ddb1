//! Session authentication and account-link checks.

use conviction_types::AccountId;
use tracing::{debug, warn};

use crate::error::{ConvictionError, Result};
use crate::store::DocumentStore;

/// Identity bound to the session, or `NotAuthenticated`.
pub fn check_auth(store: &dyn DocumentStore) -> Result<&str> {
    store.did().ok_or(ConvictionError::NotAuthenticated)
}

/// Confirm that `address` on `chain_id` is linked to the session identity.
///
/// Lookup always uses the lower-cased CAIP-10 form, so checksummed and
/// plain addresses behave the same. Returns the account that was checked.
pub async fn verify_account_link(
    store: &dyn DocumentStore,
    address: &str,
    chain_id: u64,
) -> Result<AccountId> {
    let authenticated = check_auth(store)?;
    let account = AccountId::new(address, chain_id);

    let linked = store
        .resolve_account(&account)
        .await?
        .ok_or_else(|| ConvictionError::AddressNotLinked {
            address: address.to_string(),
        })?;

    if linked != authenticated {
        warn!(%account, %linked, %authenticated, "Account linked to a different identity");
        return Err(ConvictionError::AddressIdentityMismatch {
            address: address.to_string(),
            linked,
            authenticated: authenticated.to_string(),
        });
    }

    debug!(%account, did = %authenticated, "Account link verified");
    Ok(account)
}
