use crate::contract::{ContractHandle, ContractInterface};
use crate::error::{ProviderError, ResolveError};
use crate::wallet::{Address, NetworkId, WalletProvider};
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;

/// Everything the ledger operations need once the session is connected.
#[derive(Debug, Clone)]
pub struct Connection {
    /// `None` when authorization was denied and the provider exposes no
    /// default account. Reads still work; submissions do not.
    pub account: Option<Address>,
    pub network_id: NetworkId,
    pub handle: ContractHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    NotDeployed { network_id: NetworkId },
    NetworkQueryFailed(ProviderError),
    InvalidInterface(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::NotDeployed { network_id } => write!(
                f,
                "contract not deployed on this network (network id {network_id})"
            ),
            UnavailableReason::NetworkQueryFailed(err) => {
                write!(f, "could not determine the active network: {err}")
            }
            UnavailableReason::InvalidInterface(reason) => {
                write!(f, "contract interface is unusable: {reason}")
            }
        }
    }
}

/// The three terminal shapes of connection resolution.
#[derive(Debug, Clone)]
pub enum Resolution {
    Ready(Connection),
    Unavailable(UnavailableReason),
    ProviderMissing,
}

impl Resolution {
    pub fn into_result(self) -> Result<Connection, ResolveError> {
        match self {
            Resolution::Ready(connection) => Ok(connection),
            Resolution::Unavailable(reason) => Err(ResolveError::Unavailable(reason)),
            Resolution::ProviderMissing => Err(ResolveError::NoProvider),
        }
    }
}

pub struct ConnectionResolver {
    provider: Option<Arc<dyn WalletProvider>>,
    interface: Arc<ContractInterface>,
}

impl ConnectionResolver {
    /// `provider` is whatever wallet capability the environment offers;
    /// `None` means no wallet is installed.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, interface: Arc<ContractInterface>) -> Self {
        Self {
            provider,
            interface,
        }
    }

    pub async fn resolve(&self) -> Resolution {
        let Some(provider) = self.provider.clone() else {
            warn!("No wallet provider detected");
            return Resolution::ProviderMissing;
        };

        // A denied prompt does not stop the flow; the provider may still
        // expose a default account below.
        if let Err(err) = provider.request_accounts().await {
            warn!("Account authorization not granted: {}", err);
        }

        let account = match provider.accounts().await {
            Ok(accounts) => accounts.into_iter().next(),
            Err(err) => {
                warn!("Could not list accounts: {}", err);
                None
            }
        };
        match &account {
            Some(account) => info!("Connected account: {}", account),
            None => warn!("No authorized account; submissions will be refused"),
        }

        let network_id = match provider.network_id().await {
            Ok(network_id) => network_id,
            Err(err) => {
                warn!("Network id query failed: {}", err);
                return Resolution::Unavailable(UnavailableReason::NetworkQueryFailed(err));
            }
        };
        debug!("Active network id: {}", network_id);

        let Some(address) = self.interface.address_for(network_id) else {
            warn!(
                "{} is not deployed on network {}",
                self.interface.contract_name, network_id
            );
            return Resolution::Unavailable(UnavailableReason::NotDeployed { network_id });
        };

        match ContractHandle::new(provider, address, self.interface.clone()) {
            Ok(handle) => {
                info!(
                    "Resolved {} at {} on network {}",
                    self.interface.contract_name,
                    handle.address(),
                    network_id
                );
                Resolution::Ready(Connection {
                    account,
                    network_id,
                    handle,
                })
            }
            Err(err) => Resolution::Unavailable(UnavailableReason::InvalidInterface(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{DevProvider, Faults};

    const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

    fn interface() -> Arc<ContractInterface> {
        Arc::new(ContractInterface::bundled().unwrap())
    }

    async fn provider(network_id: NetworkId) -> Arc<DevProvider> {
        Arc::new(DevProvider::new(network_id, Address::from(CONTRACT), 2).await)
    }

    fn resolver(provider: &Arc<DevProvider>) -> ConnectionResolver {
        let provider: Arc<dyn WalletProvider> = provider.clone();
        ConnectionResolver::new(Some(provider), interface())
    }

    #[tokio::test]
    async fn missing_provider_is_terminal() {
        let resolver = ConnectionResolver::new(None, interface());
        let resolution = resolver.resolve().await;

        assert!(matches!(resolution, Resolution::ProviderMissing));
        assert!(matches!(
            resolution.into_result(),
            Err(ResolveError::NoProvider)
        ));
    }

    #[tokio::test]
    async fn unknown_networks_are_unavailable() {
        for network_id in [1u64, 3, 1337, 11155111] {
            let provider = provider(network_id).await;
            let resolver = resolver(&provider);

            match resolver.resolve().await {
                Resolution::Unavailable(UnavailableReason::NotDeployed { network_id: id }) => {
                    assert_eq!(id, network_id)
                }
                other => panic!("expected Unavailable, got {other:?}"),
            }
            assert_eq!(provider.read_calls(), 0);
        }
    }

    #[tokio::test]
    async fn known_network_resolves_with_first_account() {
        let provider = provider(5777).await;
        let resolver = resolver(&provider);

        let connection = resolver.resolve().await.into_result().unwrap();
        let accounts = provider.keystore().accounts().await;

        assert_eq!(connection.network_id, 5777);
        assert_eq!(connection.account.as_ref(), accounts.first());
        assert_eq!(connection.handle.address(), &Address::from(CONTRACT));
    }

    #[tokio::test]
    async fn denied_authorization_still_resolves_without_account() {
        let provider = provider(5777).await;
        provider
            .set_faults(Faults {
                deny_authorization: true,
                ..Faults::default()
            })
            .await;
        let resolver = resolver(&provider);

        let connection = resolver.resolve().await.into_result().unwrap();
        assert_eq!(connection.account, None);
    }

    #[tokio::test]
    async fn denied_authorization_uses_exposed_default_account() {
        let provider = provider(5777).await;
        provider
            .set_faults(Faults {
                deny_authorization: true,
                expose_default_account: true,
                ..Faults::default()
            })
            .await;
        let resolver = resolver(&provider);

        let connection = resolver.resolve().await.into_result().unwrap();
        assert_eq!(
            connection.account.as_ref(),
            provider.keystore().accounts().await.first()
        );
    }

    #[test]
    fn not_deployed_message_is_user_facing() {
        let reason = UnavailableReason::NotDeployed { network_id: 1 };
        assert_eq!(
            reason.to_string(),
            "contract not deployed on this network (network id 1)"
        );
    }
}
