// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod name_mapper;
pub mod projector;
pub mod builder;
pub mod change_applier;
pub mod file_resolver;
pub mod lookup;

pub mod record_resource;
pub mod record_data_source;
pub mod records_data_source;
pub mod field_data_source;
pub mod folder_service;

// Re-export use cases for convenience
pub use record_resource::{RecordResourceUseCase, RefreshOutcome, StandardRecordResourceUseCase};
pub use record_data_source::{RecordDataSourceUseCase, StandardRecordDataSourceUseCase};
pub use records_data_source::RecordsDataSource;
pub use field_data_source::FieldDataSource;
pub use folder_service::{FolderDataSources, FolderResourceUseCase, StandardFolderResourceUseCase};
pub use change_applier::ChangeApplier;
pub use lookup::RecordLookup;
