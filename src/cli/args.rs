use std::path::PathBuf;

use azrm::config::{CloudEnvironment, Overrides};
use azrm::resourceids::KnownIdType;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Default)]
pub struct GlobalArgs {
    #[arg(long, global = true, env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription: Option<String>,

    #[arg(long, global = true, env = "AZURE_TENANT_ID")]
    pub tenant: Option<String>,

    #[arg(long, global = true, env = "AZURE_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, global = true, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long, global = true, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long, global = true, env = "AZURE_ENVIRONMENT", value_enum)]
    pub environment: Option<CloudEnvironment>,

    /// Config file, defaults to `<config dir>/azrm/config.json`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            environment: self.environment,
            subscription_id: self.subscription.clone(),
            tenant_id: self.tenant.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("GlobalArgs")
            .field("subscription", &self.subscription)
            .field("tenant", &self.tenant)
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .field("access_token", &redacted(&self.access_token))
            .field("environment", &self.environment)
            .field("config", &self.config)
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate resource IDs offline
    Id {
        #[command(subcommand)]
        command: IdCommand,
    },
    /// Read, delete or list resources
    Resource {
        #[command(subcommand)]
        command: ResourceCommand,
    },
    /// List importable resources
    Discover(DiscoverArgs),
    /// Write Terraform import blocks for discovered resources
    Generate(GenerateArgs),
    /// Compare live resources with a Terraform state file
    Diff(DiffArgs),
}

#[derive(Subcommand, Debug)]
pub enum IdCommand {
    Parse(IdParseArgs),
    Validate(IdValidateArgs),
}

#[derive(clap::Args, Debug)]
pub struct IdParseArgs {
    pub id: String,

    /// Expected ID type; detected when omitted
    #[arg(long = "type", value_enum)]
    pub id_type: Option<KnownIdType>,

    /// Accept any casing of fixed segments and print the canonical form
    #[arg(long)]
    pub insensitive: bool,
}

#[derive(clap::Args, Debug)]
pub struct IdValidateArgs {
    pub id: String,

    #[arg(long = "type", value_enum)]
    pub id_type: KnownIdType,
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    Get(ResourceArgs),
    Delete(DeleteArgs),
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct ResourceArgs {
    pub id: String,

    #[arg(long)]
    pub api_version: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    pub id: String,

    #[arg(long)]
    pub api_version: String,

    /// Return once the delete is accepted instead of polling it to completion
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[arg(long, short = 'g')]
    pub resource_group: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DiscoverArgs {
    #[arg(long, short = 'g')]
    pub resource_group: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, short = 'g')]
    pub resource_group: Option<String>,

    /// File to write; stdout when omitted
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct DiffArgs {
    #[arg(long)]
    pub state: PathBuf,

    #[arg(long, short = 'g')]
    pub resource_group: Option<String>,
}
