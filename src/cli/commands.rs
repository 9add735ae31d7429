use azrm::arm::{
    ArmClient, ClientOptions, GenericResource, api_versions, credential_from_settings,
};
use azrm::config::{FileConfig, Settings};
use azrm::output;
use azrm::providers::{self, Provider};
use azrm::resourceids::{KnownIdType, ResourceGroupId, ResourceId, SubscriptionId};
use azrm::terraform::{self, TerraformState};
use azrm::{AzrmError, DiscoverConfig, Resource};

use super::args::{Cli, Command, GlobalArgs, IdCommand, ResourceCommand};

pub async fn run(cli: Cli) -> Result<(), AzrmError> {
    let Cli { global, command } = cli;

    match command {
        Command::Id { command } => id(command),
        Command::Resource { command } => resource(&settings(&global)?, command).await,
        Command::Discover(args) => {
            let (_, resources) = discover(&settings(&global)?, args.resource_group).await?;
            tracing::info!(count = resources.len(), "discovery complete");
            output::write_output(&output::resource_table(&resources), None)?;
            Ok(())
        }
        Command::Generate(args) => {
            let (provider, resources) =
                discover(&settings(&global)?, args.resource_group).await?;
            let blocks = output::import_blocks(provider.as_ref(), &resources);
            output::write_output(&blocks, args.output.as_deref())?;
            tracing::info!(count = resources.len(), "import blocks generated");
            Ok(())
        }
        Command::Diff(args) => {
            let state = TerraformState::from_file(&args.state)?;
            let (_, resources) = discover(&settings(&global)?, args.resource_group).await?;
            let report = terraform::diff(&state, &resources);
            output::write_output(&output::drift_table(&report), None)?;
            Ok(())
        }
    }
}

fn settings(global: &GlobalArgs) -> Result<Settings, AzrmError> {
    let file = FileConfig::discover(global.config.as_deref())?;
    let settings = Settings::resolve(global.overrides(), file);
    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}

fn client(settings: &Settings) -> Result<ArmClient, AzrmError> {
    let credential = credential_from_settings(settings)?;
    Ok(ArmClient::new(credential, ClientOptions::from_settings(settings))?)
}

async fn discover(
    settings: &Settings,
    resource_group: Option<String>,
) -> Result<(Box<dyn Provider>, Vec<Resource>), AzrmError> {
    let config = DiscoverConfig {
        subscription_id: Some(settings.require_subscription()?.to_string()),
        resource_group,
    };
    let provider = providers::get_provider("azurerm", Some(client(settings)?))?;
    let resources = provider.discover(&config).await?;
    Ok((provider, resources))
}

fn id(command: IdCommand) -> Result<(), AzrmError> {
    match command {
        IdCommand::Parse(args) => {
            let summary = match args.id_type {
                Some(id_type) => id_type.inspect(&args.id, args.insensitive)?,
                None => KnownIdType::detect(&args.id, args.insensitive)?,
            };
            output::write_output(&output::id_tree(&summary), None)?;
        }
        IdCommand::Validate(args) => {
            let summary = args.id_type.inspect(&args.id, false)?;
            output::write_output(
                &format!("{} is a valid {} ID", summary.id, summary.id_type),
                None,
            )?;
        }
    }
    Ok(())
}

async fn resource(settings: &Settings, command: ResourceCommand) -> Result<(), AzrmError> {
    let client = client(settings)?;

    match command {
        ResourceCommand::Get(args) => {
            let body = client.get_json(&args.id, &args.api_version).await?;
            let pretty = serde_json::to_string_pretty(&body).map_err(std::io::Error::from)?;
            output::write_output(&pretty, None)?;
        }
        ResourceCommand::Delete(args) => {
            let poller = client.delete(&args.id, &args.api_version).await?;
            if args.no_wait || poller.is_done() {
                tracing::info!(id = %args.id, "delete accepted");
            } else {
                poller.poll_until_done().await?;
                tracing::info!(id = %args.id, "deleted");
            }
        }
        ResourceCommand::List(args) => {
            let subscription = settings.require_subscription()?;
            let scope = match &args.resource_group {
                Some(name) => ResourceGroupId::new(subscription, name).id(),
                None => SubscriptionId::new(subscription).id(),
            };
            let items: Vec<GenericResource> = client
                .list_all(&format!("{}/resources", scope), api_versions::RESOURCES)
                .await?;

            let resources: Vec<Resource> = items.into_iter().map(listed_resource).collect();
            tracing::info!(count = resources.len(), "resources listed");
            output::write_output(&output::resource_table(&resources), None)?;
        }
    }
    Ok(())
}

/// Lists show every resource, importable or not, under its ARM type.
fn listed_resource(item: GenericResource) -> Resource {
    Resource {
        resource_group: resource_group_of(&item.id),
        metadata: serde_json::json!({ "location": item.location }),
        resource_type: item.resource_type,
        resource_id: item.id,
        name: item.name,
    }
}

fn resource_group_of(id: &str) -> String {
    let mut parts = id.split('/');
    while let Some(part) = parts.next() {
        if part.eq_ignore_ascii_case("resourceGroups") {
            return parts.next().unwrap_or_default().to_string();
        }
    }
    String::new()
}
