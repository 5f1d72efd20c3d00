//! Attested decryption.
//!
//! The oracle is the only way plaintext leaves the coprocessor. It releases
//! a value solely to parties holding an allowance on the handle, and every
//! release carries a signature binding the plaintext to that handle so the
//! engine's withdrawal gate can verify the pair later.

use ed25519_dalek::{SigningKey, VerifyingKey};
use thiserror::Error;

use crate::attestation::DisclosureAttestation;
use crate::coprocessor::LocalCoprocessor;
use crate::handle::Handle;
use crate::party::PartyId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OracleError {
    #[error("no allowance authorizes this requester for this handle")]
    NotAuthorized,
    #[error("handle does not reference a registered ciphertext")]
    UnknownHandle,
}

/// A plaintext released by the oracle, together with the attestation that
/// binds it to the handle it was decrypted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisclosedPlaintext {
    pub handle: Handle,
    pub plaintext: u128,
    pub attestation: DisclosureAttestation,
}

pub trait DecryptionOracle: Send + Sync {
    /// Decrypts `handle` for `requester`, refusing unless an allowance for
    /// the pair exists.
    fn decrypt(&self, handle: Handle, requester: PartyId)
        -> Result<DisclosedPlaintext, OracleError>;
}

/// Oracle backed by a `LocalCoprocessor` clone and a resident signing key.
pub struct LocalDecryptionOracle {
    backend: LocalCoprocessor,
    attestor: SigningKey,
}

impl LocalDecryptionOracle {
    pub fn new(backend: LocalCoprocessor, attestor: SigningKey) -> Self {
        Self { backend, attestor }
    }

    /// The public half of the oracle's attestation key, for keyring
    /// enrollment.
    pub fn attestor_key(&self) -> VerifyingKey {
        self.attestor.verifying_key()
    }
}

impl DecryptionOracle for LocalDecryptionOracle {
    fn decrypt(
        &self,
        handle: Handle,
        requester: PartyId,
    ) -> Result<DisclosedPlaintext, OracleError> {
        // Authorization is checked before existence so probing an unknown
        // handle reveals nothing about the handle space.
        if !self.backend.is_allowed(handle, &requester) {
            return Err(OracleError::NotAuthorized);
        }
        let plaintext = self
            .backend
            .value_of(handle)
            .ok_or(OracleError::UnknownHandle)?;

        let signature = veildraw_verifier::sign_disclosure(
            &self.attestor,
            &handle.to_le_bytes(),
            &plaintext.to_le_bytes(),
        );
        Ok(DisclosedPlaintext {
            handle,
            plaintext,
            attestation: DisclosureAttestation {
                attestor: self.attestor.verifying_key().to_bytes(),
                signature,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::coprocessor::Coprocessor;

    use super::*;

    fn oracle_pair() -> (LocalCoprocessor, LocalDecryptionOracle) {
        let coprocessor = LocalCoprocessor::new([3u8; 32]);
        let oracle =
            LocalDecryptionOracle::new(coprocessor.clone(), SigningKey::from_bytes(&[7u8; 32]));
        (coprocessor, oracle)
    }

    #[test]
    fn refuses_without_an_allowance() {
        let (coprocessor, oracle) = oracle_pair();
        let handle = coprocessor
            .register(&coprocessor.seal(42).expect("seal"))
            .expect("register");
        assert_eq!(
            oracle.decrypt(handle, PartyId::new([1u8; 32])),
            Err(OracleError::NotAuthorized)
        );
    }

    #[test]
    fn releases_to_the_granted_party_only() {
        let (coprocessor, oracle) = oracle_pair();
        let alice = PartyId::new([1u8; 32]);
        let bob = PartyId::new([2u8; 32]);
        let handle = coprocessor
            .register(&coprocessor.seal(42).expect("seal"))
            .expect("register");
        coprocessor.grant_allowance(handle, alice).expect("grant");

        let disclosed = oracle.decrypt(handle, alice).expect("decrypt");
        assert_eq!(disclosed.handle, handle);
        assert_eq!(disclosed.plaintext, 42);
        assert_eq!(
            oracle.decrypt(handle, bob),
            Err(OracleError::NotAuthorized)
        );
    }

    #[test]
    fn unknown_handles_read_as_unauthorized() {
        let (_coprocessor, oracle) = oracle_pair();
        assert_eq!(
            oracle.decrypt(Handle::new(0xdead), PartyId::new([1u8; 32])),
            Err(OracleError::NotAuthorized)
        );
    }

    #[test]
    fn disclosures_verify_against_the_attestor_key() {
        let (coprocessor, oracle) = oracle_pair();
        let alice = PartyId::new([1u8; 32]);
        let handle = coprocessor
            .register(&coprocessor.seal(7).expect("seal"))
            .expect("register");
        coprocessor.grant_allowance(handle, alice).expect("grant");

        let disclosed = oracle.decrypt(handle, alice).expect("decrypt");
        veildraw_verifier::verify_disclosure(
            &disclosed.handle.to_le_bytes(),
            &disclosed.plaintext.to_le_bytes(),
            &disclosed.attestation.attestor,
            &disclosed.attestation.signature,
        )
        .expect("verify");
        assert_eq!(
            disclosed.attestation.attestor,
            oracle.attestor_key().to_bytes()
        );
    }
}
