use crate::domain::Transfer;

/// Decides whether a caller may move funds out of a source account.
pub trait Authenticator: Send + Sync {
    fn authorize(&self, transfer: &Transfer) -> bool;
}

/// Lets every transfer through. Only suitable for the simulation.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Authenticator for AllowAll {
    fn authorize(&self, _transfer: &Transfer) -> bool {
        true
    }
}

/// Rejects every transfer.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn authorize(&self, _transfer: &Transfer) -> bool {
        false
    }
}
