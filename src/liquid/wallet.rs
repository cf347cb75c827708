use std::path::{Path, PathBuf};

use crate::liquid::exec::ToolInvocation;
use crate::swap::proposal::{clamp_fee_rate, format_fee_rate};
use crate::swap::{ConfidentialAddress, MINIMUM_FEE_RATE, Payload, ProposalInfo};

pub const WALLET_CLI_PROGRAM: &str = "liquidswap-cli";
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";
pub const DEFAULT_CONF_FILE: &str = "/etc/liquidswap/elements.conf";

const LOCALE_ENV: [(&str, &str); 2] = [("LC_ALL", "C.UTF-8"), ("LANG", "C.UTF-8")];

/// Marks "read the payload from stdin" in the wallet tool's argument list.
const STDIN_TOKEN: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapCommand {
    Info,
    Propose,
    Finalize,
    Accept,
}

impl SwapCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapCommand::Info => "info",
            SwapCommand::Propose => "propose",
            SwapCommand::Finalize => "finalize",
            SwapCommand::Accept => "accept",
        }
    }
}

/// One element of a wallet tool command line.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArg {
    Token(String),
    /// Expands to the four positional proposal tokens.
    Proposal(ProposalInfo),
    /// Expands to `-` and routes the payload to stdin.
    Stdin(Payload),
}

impl CommandArg {
    fn token(token: impl Into<String>) -> Self {
        CommandArg::Token(token.into())
    }
}

impl From<SwapCommand> for CommandArg {
    fn from(command: SwapCommand) -> Self {
        CommandArg::token(command.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletCliConfig {
    pub program: String,
    /// Directory holding `program`; `None` resolves it as given. The tool runs with a
    /// cleared environment, so a bare name is looked up in the platform's default search
    /// path rather than the service's `PATH`. Give an absolute `program` in that case.
    pub bin_dir: Option<PathBuf>,
    pub conf_file: PathBuf,
    /// Pass `--send` to `finalize` so the tool broadcasts the transaction.
    pub broadcast_on_finalize: bool,
    /// Fee rates below this are raised to it.
    pub min_fee_rate: f64,
}

impl Default for WalletCliConfig {
    fn default() -> Self {
        Self {
            program: WALLET_CLI_PROGRAM.to_string(),
            bin_dir: Some(PathBuf::from(DEFAULT_BIN_DIR)),
            conf_file: PathBuf::from(DEFAULT_CONF_FILE),
            broadcast_on_finalize: true,
            min_fee_rate: MINIMUM_FEE_RATE,
        }
    }
}

/// Builds `liquidswap-cli` invocations.
#[derive(Debug, Clone)]
pub struct WalletCli {
    cfg: WalletCliConfig,
}

impl WalletCli {
    pub fn new(cfg: WalletCliConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &WalletCliConfig {
        &self.cfg
    }

    pub fn conf_file(&self) -> &Path {
        &self.cfg.conf_file
    }

    pub fn program_path(&self) -> PathBuf {
        match &self.cfg.bin_dir {
            Some(dir) => dir.join(&self.cfg.program),
            None => PathBuf::from(&self.cfg.program),
        }
    }

    /// `--conf-file <path>` always leads, followed by `args` in order.
    pub fn build(&self, args: impl IntoIterator<Item = CommandArg>) -> ToolInvocation {
        let mut final_args = vec![
            "--conf-file".to_string(),
            self.cfg.conf_file.to_string_lossy().into_owned(),
        ];
        let mut stdin = None;

        for arg in args {
            match arg {
                CommandArg::Token(token) => final_args.push(token),
                CommandArg::Proposal(proposal) => final_args.extend(proposal.args()),
                CommandArg::Stdin(payload) => {
                    final_args.push(STDIN_TOKEN.to_string());
                    stdin = payload.stdin().map(<[u8]>::to_vec);
                }
            }
        }

        ToolInvocation {
            program: self.program_path(),
            env: LOCALE_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            args: final_args,
            stdin,
        }
    }

    pub fn propose(
        &self,
        address: &ConfidentialAddress,
        proposal: &ProposalInfo,
        fee_rate: f64,
    ) -> ToolInvocation {
        self.build([
            CommandArg::token("--with-address"),
            CommandArg::token(address.as_str()),
            SwapCommand::Propose.into(),
            CommandArg::token("--fee-rate"),
            CommandArg::Token(self.fee_rate_arg(fee_rate)),
            CommandArg::Proposal(proposal.clone()),
        ])
    }

    pub fn accept(
        &self,
        address: &ConfidentialAddress,
        payload: &Payload,
        fee_rate: f64,
    ) -> ToolInvocation {
        self.build([
            CommandArg::token("--with-address"),
            CommandArg::token(address.as_str()),
            SwapCommand::Accept.into(),
            CommandArg::token("--fee-rate"),
            CommandArg::Token(self.fee_rate_arg(fee_rate)),
            CommandArg::Stdin(payload.clone()),
        ])
    }

    pub fn finalize(&self, payload: &Payload) -> ToolInvocation {
        let mut args = vec![CommandArg::from(SwapCommand::Finalize)];
        if self.cfg.broadcast_on_finalize {
            args.push(CommandArg::token("--send"));
        }
        args.push(CommandArg::Stdin(payload.clone()));
        self.build(args)
    }

    pub fn info(&self, payload: &Payload) -> ToolInvocation {
        self.build([
            SwapCommand::Info.into(),
            CommandArg::Stdin(payload.clone()),
        ])
    }

    fn fee_rate_arg(&self, fee_rate: f64) -> String {
        format_fee_rate(clamp_fee_rate(fee_rate, self.cfg.min_fee_rate))
    }
}
