// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider Surface
//!
//! Registry of resource and data source type names plus the CRUD entry
//! points a plugin-protocol adapter calls. Attribute state crosses this
//! boundary as JSON maps; failures cross it as [`Diagnostics`].
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Dispatch by type name and error-to-diagnostic translation

use std::sync::Arc;

use anyhow::Context;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::application::change_applier::ChangeApplier;
use crate::application::field_data_source::FieldDataSource;
use crate::application::folder_service::{
    FolderDataSources, FolderResourceUseCase, StandardFolderResourceUseCase,
};
use crate::application::lookup::RecordLookup;
use crate::application::record_data_source::{
    RecordDataSourceUseCase, StandardRecordDataSourceUseCase,
};
use crate::application::record_resource::{
    RecordResourceUseCase, RefreshOutcome, StandardRecordResourceUseCase,
};
use crate::application::records_data_source::RecordsDataSource;
use crate::domain::attributes::ChangeSet;
use crate::domain::client::{PasswordGenerator, SecretsManagerClient, TotpGenerator};
use crate::domain::config::ProviderConfigManifest;
use crate::domain::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::record::RecordType;
use crate::domain::schema::{
    self, record_schema, record_type_for, FIELD_DATA_SOURCE, FOLDERS_DATA_SOURCE,
    FOLDER_DATA_SOURCE, FOLDER_RESOURCE, RECORDS_DATA_SOURCE,
};
use crate::infrastructure::memory_vault::InMemorySecretsManager;
use crate::infrastructure::password_generator::RandomPasswordGenerator;
use crate::infrastructure::totp::OtpAuthTotpGenerator;

/// Resource type names resolved against the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Record(RecordType),
    Folder,
}

impl ResourceKind {
    pub fn parse(type_name: &str) -> Option<Self> {
        if type_name == FOLDER_RESOURCE {
            return Some(ResourceKind::Folder);
        }
        record_type_for(type_name)
            .filter(|t| record_schema(*t).has_resource)
            .map(ResourceKind::Record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    Record(RecordType),
    Folder,
    Folders,
    Field,
    Records,
}

impl DataSourceKind {
    pub fn parse(type_name: &str) -> Option<Self> {
        match type_name {
            FOLDER_DATA_SOURCE => Some(DataSourceKind::Folder),
            FOLDERS_DATA_SOURCE => Some(DataSourceKind::Folders),
            FIELD_DATA_SOURCE => Some(DataSourceKind::Field),
            RECORDS_DATA_SOURCE => Some(DataSourceKind::Records),
            other => record_type_for(other).map(DataSourceKind::Record),
        }
    }
}

/// New state of one operation. `state` is `None` when the object is gone
/// or the operation failed; check `diagnostics` to tell the two apart.
#[derive(Debug, Clone, Default)]
pub struct OperationResult {
    pub state: Option<Map<String, Value>>,
    pub diagnostics: Diagnostics,
}

impl OperationResult {
    fn state(state: Map<String, Value>) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    fn removed() -> Self {
        Self::default()
    }

    fn failed(err: &ProviderError) -> Self {
        Self {
            state: None,
            diagnostics: error_diagnostic(err).into(),
        }
    }
}

pub fn error_diagnostic(err: &ProviderError) -> Diagnostic {
    Diagnostic::error(err.to_string())
}

/// Import failures are reported as a single message
pub fn import_error_message(diagnostic: &Diagnostic) -> String {
    if diagnostic.detail.is_empty() {
        diagnostic.summary.clone()
    } else {
        format!("{} *** Details: {}", diagnostic.summary, diagnostic.detail)
    }
}

fn unknown_type(kind: &str, type_name: &str) -> ProviderError {
    ProviderError::validation(format!("unknown {} type '{}'", kind, type_name))
}

pub struct SecretsManagerProvider {
    client: Arc<dyn SecretsManagerClient>,
    records: Arc<dyn RecordResourceUseCase>,
    record_sources: Arc<dyn RecordDataSourceUseCase>,
    folders: Arc<dyn FolderResourceUseCase>,
    folder_sources: FolderDataSources,
    records_source: RecordsDataSource,
    field_source: FieldDataSource,
}

impl SecretsManagerProvider {
    pub fn new(
        client: Arc<dyn SecretsManagerClient>,
        generator: Arc<dyn PasswordGenerator>,
        totp: Arc<dyn TotpGenerator>,
        default_password_length: i64,
    ) -> Self {
        let lookup = RecordLookup::new(client.clone());
        let applier = Arc::new(ChangeApplier::new(generator, default_password_length));
        Self {
            client,
            records: Arc::new(StandardRecordResourceUseCase::new(lookup.clone(), applier)),
            record_sources: Arc::new(StandardRecordDataSourceUseCase::new(lookup.clone(), totp)),
            folders: Arc::new(StandardFolderResourceUseCase::new(lookup.clone())),
            folder_sources: FolderDataSources::new(lookup.clone()),
            records_source: RecordsDataSource::new(lookup.clone()),
            field_source: FieldDataSource::new(lookup),
        }
    }

    /// Provider with the default generators over `client`
    pub fn with_client(client: Arc<dyn SecretsManagerClient>, default_password_length: i64) -> Self {
        Self::new(
            client,
            Arc::new(RandomPasswordGenerator::new()),
            Arc::new(OtpAuthTotpGenerator::new()),
            default_password_length,
        )
    }

    /// Build the provider from a validated configuration manifest.
    ///
    /// Only snapshot-backed vaults can be served; a credential without a
    /// `vault_file` is rejected since no live transport is linked in.
    pub fn configure(manifest: &ProviderConfigManifest) -> anyhow::Result<Self> {
        manifest.validate().context("invalid provider configuration")?;

        let Some(vault_file) = &manifest.spec.vault_file else {
            return Err(ProviderError::Configuration(
                "no vault transport available for credential-only configuration - set spec.vault_file"
                    .to_string(),
            )
            .into());
        };
        let vault = InMemorySecretsManager::load(vault_file)
            .with_context(|| format!("failed to open vault snapshot {:?}", vault_file))?;
        info!(
            provider = %manifest.metadata.name,
            records = vault.record_count(),
            "Configured provider from vault snapshot"
        );
        Ok(Self::with_client(
            Arc::new(vault),
            manifest.spec.default_password_length,
        ))
    }

    pub fn client(&self) -> &Arc<dyn SecretsManagerClient> {
        &self.client
    }

    pub fn resource_names(&self) -> Vec<String> {
        schema::resource_names()
    }

    pub fn data_source_names(&self) -> Vec<String> {
        schema::data_source_names()
    }

    fn resource_kind(type_name: &str) -> ProviderResult<ResourceKind> {
        ResourceKind::parse(type_name).ok_or_else(|| unknown_type("resource", type_name))
    }

    pub async fn create_resource(
        &self,
        type_name: &str,
        planned: Map<String, Value>,
    ) -> OperationResult {
        debug!(resource = %type_name, "Create resource");
        let mut changes = ChangeSet::from_planned(planned);
        let result = match Self::resource_kind(type_name) {
            Ok(ResourceKind::Record(record_type)) => {
                self.records.create(record_type, &mut changes).await
            }
            Ok(ResourceKind::Folder) => self.folders.create(&mut changes).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => OperationResult::state(changes.into_planned()),
            Err(e) => OperationResult::failed(&e),
        }
    }

    pub async fn read_resource(&self, type_name: &str, state: Map<String, Value>) -> OperationResult {
        debug!(resource = %type_name, "Read resource");
        let mut changes = ChangeSet::from_state(state);
        let result = match Self::resource_kind(type_name) {
            Ok(ResourceKind::Record(record_type)) => {
                self.records.read(record_type, &mut changes).await
            }
            Ok(ResourceKind::Folder) => self.folders.read(&mut changes).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(RefreshOutcome::Present) => OperationResult::state(changes.into_planned()),
            Ok(RefreshOutcome::Removed) => OperationResult::removed(),
            Err(e) => OperationResult::failed(&e),
        }
    }

    pub async fn update_resource(
        &self,
        type_name: &str,
        prior: Map<String, Value>,
        planned: Map<String, Value>,
    ) -> OperationResult {
        debug!(resource = %type_name, "Update resource");
        let mut changes = ChangeSet::new(prior, planned);
        let result = match Self::resource_kind(type_name) {
            Ok(ResourceKind::Record(record_type)) => {
                self.records.update(record_type, &mut changes).await
            }
            Ok(ResourceKind::Folder) => self.folders.update(&mut changes).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => OperationResult::state(changes.into_planned()),
            Err(e) => OperationResult::failed(&e),
        }
    }

    pub async fn delete_resource(&self, type_name: &str, state: Map<String, Value>) -> Diagnostics {
        debug!(resource = %type_name, "Delete resource");
        let changes = ChangeSet::from_state(state);
        let result = match Self::resource_kind(type_name) {
            Ok(ResourceKind::Record(record_type)) => {
                self.records.delete(record_type, &changes).await
            }
            Ok(ResourceKind::Folder) => self.folders.delete(&changes).await,
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| error_diagnostic(&e).into())
    }

    /// Import by UID. Errors are flattened into one message.
    pub async fn import_resource(
        &self,
        type_name: &str,
        id: &str,
    ) -> Result<Map<String, Value>, String> {
        debug!(resource = %type_name, uid = %id, "Import resource");
        let result = match Self::resource_kind(type_name) {
            Ok(ResourceKind::Record(record_type)) => self.records.import(record_type, id).await,
            Ok(ResourceKind::Folder) => self.folders.import(id).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| import_error_message(&error_diagnostic(&e)))
    }

    pub async fn read_data_source(
        &self,
        type_name: &str,
        config: Map<String, Value>,
    ) -> OperationResult {
        debug!(data_source = %type_name, "Read data source");
        let mut changes = ChangeSet::from_planned(config);
        let result = match DataSourceKind::parse(type_name) {
            Some(DataSourceKind::Record(record_type)) => {
                self.record_sources.read(record_type, &mut changes).await
            }
            Some(DataSourceKind::Folder) => self.folder_sources.read_folder(&mut changes).await,
            Some(DataSourceKind::Folders) => self.folder_sources.read_folders(&mut changes).await,
            Some(DataSourceKind::Field) => self.field_source.read(&mut changes).await,
            Some(DataSourceKind::Records) => self.records_source.read(&mut changes).await,
            None => Err(unknown_type("data source", type_name)),
        };
        match result {
            Ok(()) => OperationResult::state(changes.into_planned()),
            Err(e) => OperationResult::failed(&e),
        }
    }
}
