//! # Escrow CLI
use crate::{
    chains::Network,
    config::{ConfigSource, EnvSource, EscrowConfig, keys},
    drivers::{CommitmentEscrowDriver, EscrowClients, HtlcEscrowDriver},
    identifiers::{derive_recipient_hash, derive_transfer_id, normalize_email, salt_version_digest},
    types::{Secret, TransferRequest},
    units::{format_atomic_amount, to_atomic_amount, validate_amount, validate_expiry},
    version::ESCROW_VERSION,
};
use alloy::primitives::{Address, B256, U256};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Email-addressed token escrow on Base.
#[derive(Debug, Parser)]
#[command(author, version = ESCROW_VERSION, about = "Email escrow", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, the configuration is read from `ESCROW_*` environment variables.
    #[arg(long, value_name = "CONFIG", env = "ESCROW_CONFIG")]
    pub config: Option<PathBuf>,
    /// Overrides the configured network.
    #[arg(long, value_name = "NETWORK")]
    pub network: Option<Network>,
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands of the escrow CLI.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Escrow tokens for an email recipient in the commitment escrow.
    Create(RequestArgs),
    /// Lock tokens behind a fresh secret in the HTLC escrow.
    Lock(RequestArgs),
    /// Claim a commitment transfer on behalf of the owner of an email address.
    Claim {
        /// The transfer id.
        #[arg(long)]
        transfer_id: B256,
        /// The address receiving the funds.
        #[arg(long)]
        recipient: Address,
        /// The recipient email the transfer was created for.
        #[arg(long)]
        email: String,
    },
    /// Claim an HTLC transfer with its secret.
    ClaimTo {
        /// The transfer id.
        #[arg(long)]
        transfer_id: B256,
        /// The secret delivered to the recipient.
        #[arg(long, env = "ESCROW_HTLC_SECRET", hide_env_values = true)]
        secret: Secret,
        /// The address receiving the funds.
        #[arg(long)]
        recipient: Address,
    },
    /// Refund a commitment transfer.
    Refund {
        /// The transfer id.
        #[arg(long)]
        transfer_id: B256,
        /// The address receiving the refund.
        #[arg(long)]
        refund_to: Address,
    },
    /// Refund an expired HTLC transfer to its sender.
    RefundHtlc {
        /// The transfer id.
        #[arg(long)]
        transfer_id: B256,
    },
    /// Cancel a pending HTLC transfer.
    Cancel {
        /// The transfer id.
        #[arg(long)]
        transfer_id: B256,
    },
    /// Read a commitment transfer.
    State {
        /// The transfer id.
        #[arg(long)]
        transfer_id: B256,
        /// Also check whether this email is the committed recipient.
        #[arg(long)]
        email: Option<String>,
    },
    /// Read the status of one or more HTLC transfers.
    Status {
        /// The transfer ids.
        #[arg(long = "transfer-id", required = true)]
        transfer_ids: Vec<B256>,
    },
    /// Derive the recipient hash and transfer id of a commitment transfer. Performs no I/O.
    DeriveId {
        /// The recipient email.
        #[arg(long)]
        email: String,
        /// The human readable amount.
        #[arg(long)]
        amount: String,
        /// The token decimals.
        #[arg(long)]
        decimals: u8,
        /// The expiry as unix seconds.
        #[arg(long)]
        expiry: u64,
    },
    /// Print the ERC-20 approval the treasury must execute before funds can be escrowed.
    Approve {
        /// The human readable amount.
        #[arg(long)]
        amount: String,
        /// The token decimals. Read from the token if omitted.
        #[arg(long)]
        decimals: Option<u8>,
        /// The token. Defaults to the configured token.
        #[arg(long)]
        token: Option<Address>,
        /// Approve the HTLC escrow instead of the commitment escrow.
        #[arg(long)]
        htlc: bool,
    },
}

/// Arguments of a creation request.
#[derive(Debug, clap::Args)]
pub struct RequestArgs {
    /// The recipient email.
    #[arg(long)]
    pub email: String,
    /// The human readable amount, e.g. `100.5`.
    #[arg(long)]
    pub amount: String,
    /// The token decimals. Read from the token if omitted.
    #[arg(long)]
    pub decimals: Option<u8>,
    /// The token. Defaults to the configured token.
    #[arg(long)]
    pub token: Option<Address>,
    /// The expiry as unix seconds. Defaults to now plus the configured expiry window.
    #[arg(long)]
    pub expiry: Option<u64>,
    /// The wallet funds are pulled from. Defaults to the configured treasury.
    #[arg(long)]
    pub from: Option<Address>,
}

impl Args {
    /// Loads the configuration and runs the command, printing its result as JSON.
    pub async fn run(self) -> eyre::Result<()> {
        let config = self.load_config()?;
        info!(version = ESCROW_VERSION, network = %config.network, "Loaded configuration");

        match self.command {
            Command::DeriveId { email, amount, decimals, expiry } => {
                print_json(&derive_id(&config, &email, &amount, decimals, expiry)?)
            }
            command => execute(&config, command).await,
        }
    }

    /// Reads the configuration file if given, else the environment.
    ///
    /// `ESCROW_RELAYER_KEY` applies in both cases, since secrets are never written to the file.
    fn load_config(&self) -> eyre::Result<EscrowConfig> {
        let env = EnvSource::default();
        let mut config = match &self.config {
            Some(path) => EscrowConfig::load_from_file(path)?
                .with_relayer_key(env.get(keys::RELAYER_KEY)),
            None => EscrowConfig::from_source(&env)?,
        };
        if let Some(network) = self.network {
            config.network = network;
        }
        Ok(config)
    }
}

/// Runs a command that talks to the chain.
async fn execute(config: &EscrowConfig, command: Command) -> eyre::Result<()> {
    let clients = EscrowClients::from_config(config)?;
    let commitment = CommitmentEscrowDriver::new(config, clients.clone());
    let htlc = HtlcEscrowDriver::new(config, clients);

    match command {
        Command::Create(args) => {
            let request = args.into_request(&commitment, config).await?;
            print_json(&commitment.create_transfer(request).await?)
        }
        Command::Lock(args) => {
            let request = args.into_request(&commitment, config).await?;
            print_json(&htlc.create_transfer(request).await?)
        }
        Command::Claim { transfer_id, recipient, email } => {
            print_json(&commitment.claim_transfer(transfer_id, recipient, &email).await?)
        }
        Command::ClaimTo { transfer_id, secret, recipient } => {
            print_json(&htlc.claim_to_recipient(transfer_id, &secret, recipient).await?)
        }
        Command::Refund { transfer_id, refund_to } => {
            print_json(&commitment.refund_transfer(transfer_id, refund_to).await?)
        }
        Command::RefundHtlc { transfer_id } => {
            print_json(&htlc.refund_transfer(transfer_id).await?)
        }
        Command::Cancel { transfer_id } => print_json(&htlc.cancel_transfer(transfer_id).await?),
        Command::State { transfer_id, email } => {
            let state = commitment.load_onchain_state(transfer_id).await?;
            let recipient_matches = match (&state, email) {
                (Some(state), Some(email)) => {
                    Some(state.recipient_hash == commitment.recipient_hash(&email))
                }
                _ => None,
            };
            print_json(&serde_json::json!({
                "transfer": state,
                "recipientMatches": recipient_matches,
            }))
        }
        Command::Status { transfer_ids } => {
            let statuses = htlc.get_transfer_statuses(&transfer_ids).await?;
            let statuses = transfer_ids
                .iter()
                .zip(statuses)
                .map(|(id, status)| serde_json::json!({ "transferId": id, "status": status }))
                .collect::<Vec<_>>();
            print_json(&statuses)
        }
        Command::Approve { amount, decimals, token, htlc: use_htlc } => {
            let token = token.unwrap_or_else(|| config.token());
            let decimals = match decimals {
                Some(decimals) => decimals,
                None => commitment.reader().token_decimals(token).await?,
            };
            let amount = validate_amount(to_atomic_amount(&amount, decimals)?)?;
            let call = if use_htlc {
                htlc.approval_call(Some(token), amount)?
            } else {
                commitment.approval_call(Some(token), amount)?
            };
            print_json(&call)
        }
        Command::DeriveId { email, amount, decimals, expiry } => {
            print_json(&derive_id(config, &email, &amount, decimals, expiry)?)
        }
    }
}

impl RequestArgs {
    /// Builds a transfer request, reading the token decimals from chain when not given.
    async fn into_request(
        self,
        commitment: &CommitmentEscrowDriver,
        config: &EscrowConfig,
    ) -> eyre::Result<TransferRequest> {
        let decimals = match self.decimals {
            Some(decimals) => decimals,
            None => {
                let token = self.token.unwrap_or_else(|| config.token());
                commitment.reader().token_decimals(token).await?
            }
        };

        let mut request = TransferRequest::new(self.email, self.amount, decimals);
        request.token = self.token;
        request.expiry = self.expiry;
        request.funding_wallet = self.from;
        Ok(request)
    }
}

/// Recipient hash and id of a commitment transfer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DerivedId {
    normalized_email: String,
    recipient_hash: B256,
    amount: String,
    atomic_amount: U256,
    expiry: u64,
    transfer_id: B256,
}

fn derive_id(
    config: &EscrowConfig,
    email: &str,
    amount: &str,
    decimals: u8,
    expiry: u64,
) -> eyre::Result<DerivedId> {
    let atomic = to_atomic_amount(amount, decimals)?;
    let encoded_amount = validate_amount(atomic)?;
    let encoded_expiry = validate_expiry(expiry)?;

    let normalized_email = normalize_email(email);
    let recipient_hash =
        derive_recipient_hash(salt_version_digest(&config.salt_version), &normalized_email);

    Ok(DerivedId {
        transfer_id: derive_transfer_id(recipient_hash, encoded_amount, encoded_expiry),
        normalized_email,
        recipient_hash,
        amount: format_atomic_amount(atomic, decimals)?,
        atomic_amount: atomic,
        expiry,
    })
}

fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
