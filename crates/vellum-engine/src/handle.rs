//! Engine handle and registries
//!
//! `EngineHandle` owns the id-keyed registries and implements the whole
//! operational trait surface. Relations are explicit in the records:
//! field schemas live inside their blueprint entry and field values plus the
//! status ledger live inside their contract entry (owned, removed with the
//! parent), while `blueprint_id` on a contract is a plain reference that
//! blocks blueprint deletion.
//!
//! Every mutating operation validates and writes inside one write-guard
//! critical section, so its constituent writes commit together or not at
//! all, and concurrent transitions against one contract serialize: the
//! status read by the validity check is the status being replaced.
//!
//! Lock order: blueprints before contracts.

use crate::api::{
    BlueprintCatalog, ContractOperations, FieldEditor, HistoryAuditor, IntegrityReport,
    StateController, TransitionReceipt, UserDirectory,
};
use crate::error::{EngineError, NotFound, ValidationError};
use crate::ledger::StatusLedger;
use crate::lifecycle;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use vellum_model::{
    Blueprint, BlueprintId, BlueprintSpec, BlueprintView, Contract, ContractFieldView,
    ContractId, ContractStatus, ContractView, EntryId, FieldId, FieldSchema, FieldSchemaView,
    FieldType, FieldUpdate, FieldValue, HistoryEntryView, StatusHistoryEntry, UserId, ValueId,
};

/// Blueprint entry in the engine registry.
#[derive(Debug)]
struct BlueprintEntry {
    blueprint: Blueprint,
    fields: Vec<FieldSchema>,
}

/// Contract entry in the engine registry.
#[derive(Debug)]
struct ContractEntry {
    contract: Contract,
    values: Vec<FieldValue>,
    ledger: StatusLedger,
}

pub struct EngineHandle {
    users: Arc<dyn UserDirectory>,
    blueprints: RwLock<HashMap<BlueprintId, BlueprintEntry>>,
    contracts: RwLock<HashMap<ContractId, ContractEntry>>,
}

impl EngineHandle {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self {
            users,
            blueprints: RwLock::new(HashMap::new()),
            contracts: RwLock::new(HashMap::new()),
        }
    }

    fn require_user(&self, user_id: UserId) -> Result<(), EngineError> {
        if self.users.exists(user_id) {
            Ok(())
        } else {
            Err(NotFound::User(user_id).into())
        }
    }
}

fn blueprint_view(entry: &BlueprintEntry) -> BlueprintView {
    BlueprintView {
        id: entry.blueprint.blueprint_id,
        title: entry.blueprint.title.clone(),
        description: entry.blueprint.description.clone(),
        body_text: entry.blueprint.body_text.clone(),
        created_at: entry.blueprint.created_at,
        fields: entry
            .fields
            .iter()
            .map(|schema| FieldSchemaView {
                label: schema.label.clone(),
                field_type: schema.field_type,
                pos_x: schema.pos_x,
                pos_y: schema.pos_y,
                position_label: schema.position_label.clone(),
            })
            .collect(),
    }
}

/// Display rows follow schema order, not edit order.
fn field_rows(blueprint: &BlueprintEntry, entry: &ContractEntry) -> Vec<ContractFieldView> {
    blueprint
        .fields
        .iter()
        .filter_map(|schema| {
            entry
                .values
                .iter()
                .find(|value| value.field_id == schema.field_id)
                .map(|value| ContractFieldView {
                    label: schema.label.clone(),
                    field_type: schema.field_type,
                    pos_x: schema.pos_x,
                    pos_y: schema.pos_y,
                    position_label: schema.position_label.clone(),
                    value: value.value.clone(),
                })
        })
        .collect()
}

fn contract_view(blueprint: &BlueprintEntry, entry: &ContractEntry) -> ContractView {
    ContractView {
        id: entry.contract.contract_id,
        blueprint_id: entry.contract.blueprint_id,
        blueprint_title: blueprint.blueprint.title.clone(),
        body_text: blueprint.blueprint.body_text.clone(),
        status: entry.contract.status,
        created_by: entry.contract.created_by,
        created_at: entry.contract.created_at,
        updated_at: entry.contract.updated_at,
        fields: field_rows(blueprint, entry),
    }
}

impl BlueprintCatalog for EngineHandle {
    fn create_blueprint(&self, spec: BlueprintSpec) -> Result<BlueprintView, EngineError> {
        let blueprint_id = BlueprintId::new();
        let mut fields = Vec::with_capacity(spec.fields.len());
        for (index, field) in spec.fields.iter().enumerate() {
            if field.label.trim().is_empty() {
                return Err(ValidationError::EmptyLabel { index }.into());
            }
            let field_type = FieldType::from_str(&field.field_type).map_err(|_| {
                ValidationError::UnknownFieldType {
                    label: field.label.clone(),
                    tag: field.field_type.clone(),
                }
            })?;
            fields.push(FieldSchema {
                field_id: FieldId::new(),
                blueprint_id,
                label: field.label.clone(),
                field_type,
                pos_x: field.pos_x,
                pos_y: field.pos_y,
                position_label: field.position_label.clone(),
            });
        }

        let entry = BlueprintEntry {
            blueprint: Blueprint {
                blueprint_id,
                title: spec.title,
                description: spec.description,
                body_text: spec.body_text,
                created_at: Utc::now(),
            },
            fields,
        };
        let view = blueprint_view(&entry);

        self.blueprints.write().insert(blueprint_id, entry);
        tracing::info!(blueprint_id = ?blueprint_id, title = %view.title, "blueprint created");
        Ok(view)
    }

    fn get_blueprint(&self, blueprint_id: BlueprintId) -> Result<BlueprintView, EngineError> {
        let blueprints = self.blueprints.read();
        let entry = blueprints
            .get(&blueprint_id)
            .ok_or(NotFound::Blueprint(blueprint_id))?;
        Ok(blueprint_view(entry))
    }

    fn list_blueprints(&self) -> Vec<BlueprintView> {
        let blueprints = self.blueprints.read();
        let mut entries: Vec<_> = blueprints.values().collect();
        entries.sort_by_key(|e| (e.blueprint.created_at, e.blueprint.blueprint_id));
        entries.into_iter().map(blueprint_view).collect()
    }

    fn delete_blueprint(&self, blueprint_id: BlueprintId) -> Result<(), EngineError> {
        let mut blueprints = self.blueprints.write();
        if !blueprints.contains_key(&blueprint_id) {
            return Err(NotFound::Blueprint(blueprint_id).into());
        }
        let referencing = self
            .contracts
            .read()
            .values()
            .filter(|entry| entry.contract.blueprint_id == blueprint_id)
            .count();
        if referencing > 0 {
            return Err(EngineError::Conflict {
                blueprint_id,
                contracts: referencing,
            });
        }
        // Cascade: the owned field schemas leave with the entry.
        blueprints.remove(&blueprint_id);
        tracing::info!(blueprint_id = ?blueprint_id, "blueprint deleted");
        Ok(())
    }
}

impl ContractOperations for EngineHandle {
    fn create_contract(
        &self,
        blueprint_id: BlueprintId,
        user_id: UserId,
    ) -> Result<ContractView, EngineError> {
        // Holding the blueprint read guard across the insert keeps deletion
        // blocked while the contract comes into existence.
        let blueprints = self.blueprints.read();
        let blueprint = blueprints
            .get(&blueprint_id)
            .ok_or(NotFound::Blueprint(blueprint_id))?;
        self.require_user(user_id)?;

        let contract_id = ContractId::new();
        let now = Utc::now();

        let values = blueprint
            .fields
            .iter()
            .map(|schema| FieldValue {
                value_id: ValueId::new(),
                field_id: schema.field_id,
                label: schema.label.clone(),
                value: String::new(),
            })
            .collect();

        let mut ledger = StatusLedger::new();
        ledger.append(StatusHistoryEntry {
            entry_id: EntryId::new(),
            contract_id,
            previous_status: None,
            new_status: ContractStatus::Created,
            changed_by: Some(user_id),
            recorded_at: now,
            prev_hash: [0u8; 32],
            hash: [0u8; 32],
        });

        let entry = ContractEntry {
            contract: Contract {
                contract_id,
                blueprint_id,
                created_by: user_id,
                status: ContractStatus::Created,
                created_at: now,
                updated_at: now,
            },
            values,
            ledger,
        };
        let view = contract_view(blueprint, &entry);

        self.contracts.write().insert(contract_id, entry);
        tracing::info!(contract_id = ?contract_id, blueprint_id = ?blueprint_id, "contract created");
        Ok(view)
    }

    fn get_contract(&self, contract_id: ContractId) -> Result<ContractView, EngineError> {
        let blueprints = self.blueprints.read();
        let contracts = self.contracts.read();
        let entry = contracts
            .get(&contract_id)
            .ok_or(NotFound::Contract(contract_id))?;
        let blueprint = blueprints
            .get(&entry.contract.blueprint_id)
            .ok_or(NotFound::Blueprint(entry.contract.blueprint_id))?;
        Ok(contract_view(blueprint, entry))
    }

    fn list_contracts(&self, status_filter: Option<ContractStatus>) -> Vec<ContractView> {
        let blueprints = self.blueprints.read();
        let contracts = self.contracts.read();
        let mut entries: Vec<_> = contracts
            .values()
            .filter(|entry| status_filter.map_or(true, |s| entry.contract.status == s))
            .collect();
        entries.sort_by_key(|e| (e.contract.created_at, e.contract.contract_id));
        entries
            .into_iter()
            .filter_map(|entry| {
                blueprints
                    .get(&entry.contract.blueprint_id)
                    .map(|blueprint| contract_view(blueprint, entry))
            })
            .collect()
    }
}

impl StateController for EngineHandle {
    fn transition(
        &self,
        contract_id: ContractId,
        new_status: ContractStatus,
        user_id: UserId,
    ) -> Result<TransitionReceipt, EngineError> {
        self.require_user(user_id)?;

        let mut contracts = self.contracts.write();
        let entry = contracts
            .get_mut(&contract_id)
            .ok_or(NotFound::Contract(contract_id))?;

        let current = entry.contract.status;
        if let Err(err) = lifecycle::validate_transition(current, new_status) {
            tracing::warn!(
                contract_id = ?contract_id,
                from = %current,
                to = %new_status,
                "transition rejected"
            );
            return Err(err);
        }

        let recorded_at = Utc::now();
        entry.contract.status = new_status;
        entry.contract.updated_at = recorded_at;
        let entry_id = entry.ledger.append(StatusHistoryEntry {
            entry_id: EntryId::new(),
            contract_id,
            previous_status: Some(current),
            new_status,
            changed_by: Some(user_id),
            recorded_at,
            prev_hash: [0u8; 32],
            hash: [0u8; 32],
        });

        tracing::info!(
            contract_id = ?contract_id,
            from = %current,
            to = %new_status,
            "status transition applied"
        );
        Ok(TransitionReceipt {
            contract_id,
            previous_status: current,
            new_status,
            entry_id,
            recorded_at,
        })
    }

    fn current_status(&self, contract_id: ContractId) -> Result<ContractStatus, EngineError> {
        let contracts = self.contracts.read();
        let entry = contracts
            .get(&contract_id)
            .ok_or(NotFound::Contract(contract_id))?;
        Ok(entry.contract.status)
    }

    fn allowed_transitions(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<ContractStatus>, EngineError> {
        Ok(lifecycle::allowed_transitions(
            self.current_status(contract_id)?,
        ))
    }
}

impl FieldEditor for EngineHandle {
    fn update_fields(
        &self,
        contract_id: ContractId,
        updates: &[FieldUpdate],
    ) -> Result<(), EngineError> {
        let mut contracts = self.contracts.write();
        let entry = contracts
            .get_mut(&contract_id)
            .ok_or(NotFound::Contract(contract_id))?;

        if !lifecycle::editable(entry.contract.status) {
            return Err(EngineError::InvalidState {
                status: entry.contract.status,
            });
        }

        // Labels with no matching value are skipped without error; matching
        // takes the first value with the label, which is schema order.
        let mut applied = 0usize;
        for update in updates {
            if let Some(value) = entry
                .values
                .iter_mut()
                .find(|value| value.label == update.label)
            {
                value.value = update.value.clone();
                applied += 1;
            }
        }
        if applied > 0 {
            entry.contract.updated_at = Utc::now();
        }
        tracing::debug!(
            contract_id = ?contract_id,
            requested = updates.len(),
            applied,
            "field batch applied"
        );
        Ok(())
    }

    fn read_fields(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<ContractFieldView>, EngineError> {
        let blueprints = self.blueprints.read();
        let contracts = self.contracts.read();
        let entry = contracts
            .get(&contract_id)
            .ok_or(NotFound::Contract(contract_id))?;
        let blueprint = blueprints
            .get(&entry.contract.blueprint_id)
            .ok_or(NotFound::Blueprint(entry.contract.blueprint_id))?;
        Ok(field_rows(blueprint, entry))
    }
}

impl HistoryAuditor for EngineHandle {
    fn history(&self, contract_id: ContractId) -> Result<Vec<HistoryEntryView>, EngineError> {
        let contracts = self.contracts.read();
        let entry = contracts
            .get(&contract_id)
            .ok_or(NotFound::Contract(contract_id))?;
        Ok(entry
            .ledger
            .entries()
            .iter()
            .map(|e| HistoryEntryView {
                entry_id: e.entry_id,
                previous_status: e.previous_status,
                new_status: e.new_status,
                changed_by: e.changed_by,
                recorded_at: e.recorded_at,
                hash: hex::encode(e.hash),
            })
            .collect())
    }

    fn verify_history(&self, contract_id: ContractId) -> Result<IntegrityReport, EngineError> {
        let contracts = self.contracts.read();
        let entry = contracts
            .get(&contract_id)
            .ok_or(NotFound::Contract(contract_id))?;
        let chain_intact = entry.ledger.verify_integrity().is_ok();
        let head_matches_status = entry
            .ledger
            .head()
            .map(|head| head.new_status == entry.contract.status)
            .unwrap_or(false);
        Ok(IntegrityReport {
            contract_id,
            entries_checked: entry.ledger.len(),
            chain_intact,
            head_matches_status,
        })
    }
}
