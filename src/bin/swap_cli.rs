use std::io::Read as _;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser as _, Subcommand};
use liquid_swap::bus::client::SwapClient;
use liquid_swap::swap::{
    AssetId, ConfidentialAddress, DEFAULT_FEE_RATE, Payload, ProposalInfo, SwapProposal,
};
use serde_json::json;

#[derive(Debug, clap::Parser)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:50051")]
    grpc_url: String,

    /// Per-request deadline propagated to the service.
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct Terms {
    #[arg(long)]
    proposer_asset: String,

    #[arg(long)]
    proposer_amount: f64,

    #[arg(long)]
    receiver_asset: String,

    #[arg(long)]
    receiver_amount: f64,
}

impl Terms {
    fn proposal(&self) -> ProposalInfo {
        ProposalInfo {
            proposer_asset: AssetId::new(self.proposer_asset.as_str()),
            proposer_amount: self.proposer_amount,
            receiver_asset: AssetId::new(self.receiver_asset.as_str()),
            receiver_amount: self.receiver_amount,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    Create {
        #[arg(long)]
        swap_id: u64,

        #[arg(long)]
        address: String,

        #[command(flatten)]
        terms: Terms,

        #[arg(long, default_value_t = DEFAULT_FEE_RATE)]
        fee_rate: f64,
    },
    Accept {
        #[arg(long)]
        swap_id: u64,

        #[arg(long)]
        address: String,

        /// Payload string, or `-` to read it from stdin.
        #[arg(long)]
        payload: String,

        #[arg(long, default_value_t = DEFAULT_FEE_RATE)]
        fee_rate: f64,
    },
    Finalize {
        #[arg(long)]
        swap_id: u64,

        #[arg(long)]
        payload: String,
    },
    Info {
        #[arg(long)]
        swap_id: u64,

        #[arg(long)]
        payload: String,
    },
    /// Creates a proposal and inspects the resulting payload.
    Demo {
        #[arg(long, default_value_t = 42)]
        swap_id: u64,

        #[arg(long)]
        address: String,

        #[command(flatten)]
        terms: Terms,

        #[arg(long, default_value_t = DEFAULT_FEE_RATE)]
        fee_rate: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    liquid_swap::logging::init().ok();
    let args = Args::parse();

    let mut client = SwapClient::connect_lazy(args.grpc_url).context("create swap client")?;
    if let Some(secs) = args.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    let out = match args.command {
        Command::Create {
            swap_id,
            address,
            terms,
            fee_rate,
        } => {
            let proposal = client
                .create_proposal(
                    swap_id,
                    &ConfidentialAddress::new(address),
                    &terms.proposal(),
                    fee_rate,
                )
                .await
                .context("CreateProposal")?;
            proposal_json(&proposal)
        }
        Command::Accept {
            swap_id,
            address,
            payload,
            fee_rate,
        } => {
            let payload = read_payload(payload)?;
            let proposal = client
                .accept_proposal(
                    swap_id,
                    &ConfidentialAddress::new(address),
                    &payload,
                    fee_rate,
                )
                .await
                .context("AcceptProposal")?;
            proposal_json(&proposal)
        }
        Command::Finalize { swap_id, payload } => {
            let payload = read_payload(payload)?;
            let proposal = client
                .finalize_proposal(swap_id, &payload)
                .await
                .context("FinalizeProposal")?;
            proposal_json(&proposal)
        }
        Command::Info { swap_id, payload } => {
            let payload = read_payload(payload)?;
            let proposal = client
                .info_proposal(swap_id, &payload)
                .await
                .context("InfoProposal")?;
            proposal_json(&proposal)
        }
        Command::Demo {
            swap_id,
            address,
            terms,
            fee_rate,
        } => {
            let created = client
                .create_proposal(
                    swap_id,
                    &ConfidentialAddress::new(address),
                    &terms.proposal(),
                    fee_rate,
                )
                .await
                .context("CreateProposal")?;
            anyhow::ensure!(created.payload.is_valid(), "create returned an invalid payload");

            let info = client
                .info_proposal(swap_id, &created.payload)
                .await
                .context("InfoProposal")?;
            anyhow::ensure!(info.payload.is_valid(), "info returned an invalid payload");

            json!({
              "create": proposal_json(&created),
              "info": proposal_json(&info),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn read_payload(arg: String) -> Result<Payload> {
    if arg != "-" {
        return Ok(Payload::new(arg));
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("read payload from stdin")?;
    Ok(Payload::new(buf.trim_end()))
}

fn proposal_json(proposal: &SwapProposal) -> serde_json::Value {
    json!({
      "timestamp": proposal.timestamp.map(|t| t.to_rfc3339()),
      "swap_id": proposal.swap_id,
      "payload": proposal.payload.as_str(),
      "payload_valid": proposal.payload.is_valid(),
    })
}
