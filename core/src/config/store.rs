//! The live configuration store.
//!
//! A [`ConfigStore`] is owned by the application context and handed to
//! whoever needs it. All mutation goes through [`ConfigStore::set_multiple`]
//! (or the load pipeline), which stages the new values on a copy, resolves
//! derived fields, and only then applies the batch and notifies listeners.

use std::sync::Arc;

use hashbrown::HashSet;
use sha1::{Digest, Sha1};

use super::derive::{DerivedFields, KICKSTART_INPUT_KEYS};
use super::joystick::JOYSTICK_KEYS;
use super::schema::{DerivedFieldRule, KeyFlags, Schema};
use super::{ConfigValues, value_of};
use crate::error::ConfigWarning;
use crate::services::ConfigServices;

/// One key whose value changed in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    pub key: String,
    pub value: String,
}

/// Receives change notifications from a [`ConfigStore`].
///
/// Called synchronously once per applied batch, after every value of the
/// batch is in place. Implementations must not block.
pub trait ConfigListener: Send + Sync {
    fn on_config_changed(&self, changes: &[ConfigChange]);
}

/// Handle returned by [`ConfigStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    /// `None` subscribes to every key
    keys: Option<HashSet<String>>,
    listener: Arc<dyn ConfigListener>,
}

/// Schema-defined configuration values with derived-field resolution.
pub struct ConfigStore {
    schema: &'static Schema,
    values: ConfigValues,
    changed: bool,
    services: ConfigServices,
    listeners: Vec<Registration>,
    next_listener_id: u64,
}

impl ConfigStore {
    /// A store holding the launcher schema's defaults.
    pub fn new(services: ConfigServices) -> Self {
        Self::with_schema(Schema::launcher(), services)
    }

    pub fn with_schema(schema: &'static Schema, services: ConfigServices) -> Self {
        Self {
            schema,
            values: schema.defaults(),
            changed: false,
            services,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn services(&self) -> &ConfigServices {
        &self.services
    }

    /// Value of `key`, or `fallback` if the key is not in the store.
    pub fn get<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.values.get(key).map(String::as_str).unwrap_or(fallback)
    }

    /// Snapshot of every value.
    pub fn copy(&self) -> ConfigValues {
        self.values.clone()
    }

    /// Whether the configuration was modified since it was last loaded.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Vec<ConfigWarning> {
        self.set_multiple([(key, value.into())])
    }

    /// Overwrite several values in one batch.
    ///
    /// Keys outside the schema are ignored. Derived fields affected by the
    /// batch are resolved before anything is applied, and listeners see a
    /// single notification listing the keys whose value actually changed.
    pub fn set_multiple<I, K, V>(&mut self, pairs: I) -> Vec<ConfigWarning>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut staged = self.values.clone();
        let mut touched = HashSet::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            if !self.schema.contains(key) {
                tracing::debug!("Ignoring unknown configuration key {}", key);
                continue;
            }
            staged.insert(key.to_string(), value.into());
            touched.insert(key.to_string());
        }

        let warnings = self.fix_up(&mut staged, &touched);
        if self.commit(staged) > 0 {
            self.changed = true;
        }
        warnings
    }

    /// Apply only the entries of `values` that differ from the live values.
    pub fn update_from(&mut self, values: &ConfigValues) -> Vec<ConfigWarning> {
        let differing: Vec<(&String, &String)> = values
            .iter()
            .filter(|(key, value)| self.values.get(key.as_str()) != Some(*value))
            .collect();
        if differing.is_empty() {
            return Vec::new();
        }
        self.set_multiple(differing)
    }

    /// Re-resolve both kickstarts against the current model and overrides.
    pub fn update_kickstart(&mut self) -> Vec<ConfigWarning> {
        let mut staged = self.values.clone();
        let mut derived = DerivedFields::new(self.schema, &self.services);
        derived.update_kickstart(&mut staged);
        for rule in self.schema.derived_rules().iter().filter(|r| r.kind.is_rom()) {
            derived.fix_file_checksum(&mut staged, rule);
        }
        let warnings = derived.into_warnings();
        if self.commit(staged) > 0 {
            self.changed = true;
        }
        warnings
    }

    /// Assign connected devices to joystick ports that have a mode but no
    /// device. Run before handing the configuration to the emulator.
    pub fn update_joystick_ports(&mut self) {
        let mut staged = self.values.clone();
        DerivedFields::new(self.schema, &self.services).fix_joystick_ports(&mut staged);
        if self.commit(staged) > 0 {
            self.changed = true;
        }
    }

    /// Replace every value with its schema default.
    pub fn reset_to_defaults(&mut self) {
        let defaults = self.schema.defaults();
        if self.commit(defaults) > 0 {
            self.changed = true;
        }
    }

    /// SHA-1 over the checksum-flagged values, in schema order.
    pub fn checksum(&self) -> String {
        Self::checksum_values(self.schema, &self.values)
    }

    /// SHA-1 over the checksum-flagged values of an arbitrary mapping.
    /// Absent keys count as empty.
    pub fn checksum_values(schema: &Schema, values: &ConfigValues) -> String {
        let mut hasher = Sha1::new();
        for key in schema.checksum_keys() {
            hasher.update(value_of(values, key).as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Values of the sync-flagged keys, in schema order.
    pub fn sync_items(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.items_with(|flags| flags.contains(KeyFlags::SYNC))
    }

    /// Values of the keys without a dedicated code path, in schema order.
    pub fn generic_items(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.items_with(|flags| !flags.contains(KeyFlags::CUSTOM))
    }

    /// Non-empty values that belong in a configuration file, in schema order.
    pub fn export_items(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.items_with(|flags| !flags.contains(KeyFlags::NOSAVE))
            .filter(|(_, value)| !value.is_empty())
    }

    fn items_with(
        &self,
        predicate: impl Fn(KeyFlags) -> bool + 'static,
    ) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.schema
            .all_keys()
            .iter()
            .filter(move |spec| predicate(spec.flags))
            .map(move |spec| (spec.name.as_str(), value_of(&self.values, &spec.name)))
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Subscribe to changes of any key.
    pub fn subscribe(&mut self, listener: Arc<dyn ConfigListener>) -> ListenerId {
        self.register(None, listener)
    }

    /// Subscribe to changes of the given keys only.
    pub fn subscribe_keys<I, K>(&mut self, keys: I, listener: Arc<dyn ConfigListener>) -> ListenerId
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys = keys.into_iter().map(Into::into).collect();
        self.register(Some(keys), listener)
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|registration| registration.id != id);
        self.listeners.len() != before
    }

    fn register(
        &mut self,
        keys: Option<HashSet<String>>,
        listener: Arc<dyn ConfigListener>,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push(Registration { id, keys, listener });
        id
    }

    fn notify(&self, changes: &[ConfigChange]) {
        if changes.is_empty() {
            return;
        }
        for registration in &self.listeners {
            match &registration.keys {
                None => registration.listener.on_config_changed(changes),
                Some(keys) => {
                    let relevant: Vec<ConfigChange> = changes
                        .iter()
                        .filter(|change| keys.contains(&change.key))
                        .cloned()
                        .collect();
                    if !relevant.is_empty() {
                        registration.listener.on_config_changed(&relevant);
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Batch application
    // -------------------------------------------------------------------------

    /// Resolve derived fields for the keys touched by a batch.
    fn fix_up(&self, staged: &mut ConfigValues, touched: &HashSet<String>) -> Vec<ConfigWarning> {
        let changed: HashSet<&str> = touched
            .iter()
            .map(String::as_str)
            .filter(|key| value_of(staged, key) != value_of(&self.values, key))
            .collect();
        if changed.is_empty() {
            return Vec::new();
        }

        let mut derived = DerivedFields::new(self.schema, &self.services);
        let mut rules: Vec<&DerivedFieldRule> = Vec::new();
        for rule in self.schema.derived_rules() {
            if changed.contains(rule.path_key.as_str()) {
                // A checksum supplied in the same batch belongs to the new path
                if !touched.contains(&rule.sha1_key) {
                    staged.insert(rule.sha1_key.clone(), String::new());
                }
                rules.push(rule);
            }
        }
        if KICKSTART_INPUT_KEYS.iter().any(|key| changed.contains(key)) {
            derived.update_kickstart(staged);
            rules.extend(self.schema.derived_rules().iter().filter(|r| r.kind.is_rom()));
        }
        for rule in rules {
            derived.fix_file_checksum(staged, rule);
        }
        if JOYSTICK_KEYS.iter().any(|key| changed.contains(key)) {
            derived.fix_joystick_ports(staged);
        }
        derived.into_warnings()
    }

    /// Replace the live values with `staged` and notify listeners.
    ///
    /// Keys outside the schema are dropped. Returns the number of changed keys.
    pub(super) fn commit(&mut self, mut staged: ConfigValues) -> usize {
        let schema = self.schema;
        staged.retain(|key, _| {
            let known = schema.contains(key);
            if !known {
                tracing::debug!("Dropping unknown configuration key {}", key);
            }
            known
        });

        let changes: Vec<ConfigChange> = schema
            .all_keys()
            .iter()
            .filter_map(|spec| {
                let value = staged.get(spec.name.as_str())?;
                (self.values.get(spec.name.as_str()) != Some(value)).then(|| ConfigChange {
                    key: spec.name.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        self.values = staged;
        self.notify(&changes);
        changes.len()
    }

    /// Mark the configuration as freshly loaded.
    pub(super) fn mark_clean(&mut self) {
        self.changed = false;
    }
}
