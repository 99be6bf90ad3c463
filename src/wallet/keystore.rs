use crate::wallet::Address;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// Signature produced by the keystore along with the key that verifies it.
#[derive(Debug, Clone)]
pub struct SignedPayload {
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
}

/// Wallet-side key storage. Accounts keep their creation order; the first one
/// is what a provider reports as the default account.
pub struct Keystore {
    keys: RwLock<Vec<(Address, SigningKey)>>,
}

impl Keystore {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(Vec::new()),
        }
    }

    pub async fn generate_account(&self) -> Address {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let address = address_from_key(&signing_key.verifying_key());

        self.keys
            .write()
            .await
            .push((address.clone(), signing_key));

        address
    }

    pub async fn accounts(&self) -> Vec<Address> {
        self.keys
            .read()
            .await
            .iter()
            .map(|(address, _)| address.clone())
            .collect()
    }

    pub async fn contains(&self, account: &Address) -> bool {
        self.keys
            .read()
            .await
            .iter()
            .any(|(address, _)| address.matches(account))
    }

    pub async fn sign(&self, account: &Address, data: &[u8]) -> Option<SignedPayload> {
        let keys = self.keys.read().await;
        let (_, signing_key) = keys.iter().find(|(address, _)| address.matches(account))?;

        Some(SignedPayload {
            signature: signing_key.sign(data).to_bytes().to_vec(),
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
        })
    }
}

impl Default for Keystore {
    fn default() -> Self {
        Self::new()
    }
}

/// `0x` followed by the first 20 bytes of SHA-256 over the verifying key.
pub fn address_from_key(key: &VerifyingKey) -> Address {
    let digest = Sha256::digest(key.as_bytes());
    Address::new(format!("0x{}", hex::encode(&digest[..20])))
}

/// Checks `signature` over `data` and returns the signer's address.
pub fn recover_signer(public_key: &[u8], data: &[u8], signature: &[u8]) -> Option<Address> {
    let key_bytes = <&[u8; 32]>::try_from(public_key).ok()?;
    let key = VerifyingKey::from_bytes(key_bytes).ok()?;
    let signature = Signature::from_slice(signature).ok()?;

    key.verify(data, &signature).ok()?;
    Some(address_from_key(&key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generated_accounts_are_hex_addresses_in_creation_order() {
        let keystore = Keystore::new();
        let first = keystore.generate_account().await;
        let second = keystore.generate_account().await;

        assert_eq!(keystore.accounts().await, vec![first.clone(), second]);
        assert!(first.as_str().starts_with("0x"));
        assert_eq!(first.as_str().len(), 42);
    }

    #[tokio::test]
    async fn signatures_recover_the_signing_account() {
        let keystore = Keystore::new();
        let account = keystore.generate_account().await;

        let signed = keystore.sign(&account, b"payload").await.unwrap();
        let signer = recover_signer(&signed.public_key, b"payload", &signed.signature);
        assert_eq!(signer, Some(account));

        let tampered = recover_signer(&signed.public_key, b"other", &signed.signature);
        assert_eq!(tampered, None);
    }

    #[tokio::test]
    async fn unknown_accounts_cannot_sign() {
        let keystore = Keystore::new();
        assert!(keystore.sign(&Address::from("0xdead"), b"x").await.is_none());
    }
}
