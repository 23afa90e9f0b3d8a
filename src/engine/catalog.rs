// ============================================================================
// Unit Catalog
// Definition table, atomic resolution, parse cache and custom registration
// ============================================================================

use crate::domain::config::{CatalogConfig, UnitSystem};
use crate::domain::dimension::Dimension;
use crate::domain::errors::{UnitError, UnitResult};
use crate::domain::magnitude::Magnitude;
use crate::domain::quantity::Quantity;
use crate::domain::unit::Unit;
use crate::engine::builtins::{BuiltinUnit, BUILTIN_UNITS};
use crate::engine::conversion::Conversion;
use crate::engine::prefixes::{split_prefixes, Prefix, PrefixForm, BINARY_PREFIXES};
use crate::engine::suggest;
use crate::interfaces::{CatalogEvent, CatalogEventHandler, NoOpEventHandler};
use crate::parser::{normalize, normalized, tokenize, AtomResolver, Token, UnitExpr};
use crate::platform::select_kernel;
use crossbeam_skiplist::SkipMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

// ============================================================================
// Unit Definition
// ============================================================================

/// A catalog entry: one atomic unit and every spelling that reaches it.
#[derive(Debug, Clone)]
pub struct UnitDefinition {
    name: Arc<str>,
    symbol: Option<Arc<str>>,
    aliases: Vec<Arc<str>>,
    factor: f64,
    offset: f64,
    dimension: Dimension,
    prefixable: bool,
    builtin: bool,
}

impl UnitDefinition {
    fn from_builtin(row: &BuiltinUnit) -> Self {
        Self {
            name: Arc::from(row.name),
            symbol: row.symbol.map(Arc::from),
            aliases: row.aliases.iter().map(|a| Arc::from(*a)).collect(),
            factor: row.factor,
            offset: row.offset,
            dimension: row.dimension,
            prefixable: row.prefixable,
            builtin: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(|a| a.as_ref())
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn is_prefixable(&self) -> bool {
        self.prefixable
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    fn unit(&self) -> Unit {
        if self.dimension.is_dimensionless() && self.name.as_ref() == "dimensionless" {
            return Unit::dimensionless();
        }
        Unit::atomic(&self.name, self.factor, self.offset, self.dimension)
    }

    fn prefixed(&self, prefix: &Prefix) -> Unit {
        let name = format!("{}{}", prefix.name, self.name);
        Unit::atomic(&name, prefix.factor * self.factor, 0.0, self.dimension)
    }

    /// A standalone entry for `prefix` applied to this unit, used for
    /// prefixes that never split tokens.
    fn multiple(&self, prefix: &Prefix) -> UnitDefinition {
        let symbol = match (prefix.symbols.first(), &self.symbol) {
            (Some(prefix_symbol), Some(symbol)) => Some(Arc::from(format!("{}{}", prefix_symbol, symbol))),
            _ => None,
        };
        UnitDefinition {
            name: Arc::from(format!("{}{}", prefix.name, self.name)),
            symbol,
            aliases: self
                .aliases
                .iter()
                .filter(|alias| alias.chars().all(char::is_alphabetic))
                .map(|alias| Arc::from(format!("{}{}", prefix.name, alias)))
                .collect(),
            factor: prefix.factor * self.factor,
            offset: 0.0,
            dimension: self.dimension,
            prefixable: false,
            builtin: self.builtin,
        }
    }

    fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_ref())
            .chain(self.symbol.as_deref())
            .chain(self.aliases.iter().map(|a| a.as_ref()))
    }
}

// ============================================================================
// Unit Table
// ============================================================================

/// Immutable snapshot of every definition. Registration clones the table,
/// extends the clone and swaps it in.
#[derive(Debug, Clone, Default)]
struct UnitTable {
    definitions: Vec<Arc<UnitDefinition>>,
    /// Canonical names and aliases
    names: HashMap<Arc<str>, usize>,
    symbols: HashMap<Arc<str>, usize>,
    /// Lowercased names and aliases, for the case-insensitive fallback
    lowercase: HashMap<String, Vec<usize>>,
}

impl UnitTable {
    fn builtin(binary_prefixes: bool) -> Self {
        let mut table = Self::default();
        for row in BUILTIN_UNITS {
            table.insert(UnitDefinition::from_builtin(row));
        }
        if binary_prefixes {
            for base in ["bit", "byte"] {
                if let Some(index) = table.exact_index(base) {
                    let source = Arc::clone(&table.definitions[index]);
                    for prefix in BINARY_PREFIXES.iter() {
                        table.insert(source.multiple(prefix));
                    }
                }
            }
        }
        table
    }

    fn insert(&mut self, definition: UnitDefinition) {
        let index = self.definitions.len();
        self.index_name(Arc::clone(&definition.name), index);
        for alias in &definition.aliases {
            self.index_name(Arc::clone(alias), index);
        }
        if let Some(symbol) = &definition.symbol {
            self.symbols.insert(Arc::clone(symbol), index);
        }
        self.definitions.push(Arc::new(definition));
    }

    fn add_alias(&mut self, alias: Arc<str>, index: usize) {
        self.index_name(Arc::clone(&alias), index);
        Arc::make_mut(&mut self.definitions[index]).aliases.push(alias);
    }

    fn index_name(&mut self, name: Arc<str>, index: usize) {
        let entry = self.lowercase.entry(name.to_lowercase()).or_default();
        if !entry.contains(&index) {
            entry.push(index);
        }
        self.names.insert(name, index);
    }

    fn exact_index(&self, token: &str) -> Option<usize> {
        self.names
            .get(token)
            .or_else(|| self.symbols.get(token))
            .copied()
    }

    /// The one entry whose lowercased name or alias is `key`; ambiguous
    /// keys resolve to nothing.
    fn unique_lowercase(&self, key: &str) -> Option<&Arc<UnitDefinition>> {
        match self.lowercase.get(key).map(Vec::as_slice) {
            Some([index]) => Some(&self.definitions[*index]),
            _ => None,
        }
    }

    fn spellings(&self) -> impl Iterator<Item = &str> {
        self.names.keys().chain(self.symbols.keys()).map(|s| s.as_ref())
    }
}

// ============================================================================
// Cache Statistics
// ============================================================================

/// Parse-cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Parses served from the cache
    pub hits: u64,
    /// Parses that had to build the unit
    pub misses: u64,
    /// Atomic tokens resolved against the definition table
    pub resolutions: u64,
    /// Entries currently cached
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ============================================================================
// Unit Catalog
// ============================================================================

/// Registry of units and entry point for parsing unit strings.
///
/// Every catalog is independent: custom units defined in one are invisible
/// to another. All methods take `&self`; the catalog is `Send + Sync` and
/// can be shared behind an `Arc`.
///
/// # Example
/// ```
/// use unit_engine::prelude::*;
///
/// let catalog = UnitCatalog::new();
/// catalog.define("furlong", "220 yard").unwrap();
///
/// let race = catalog.quantity(1.0, "furlong").unwrap();
/// let meters = catalog.convert(&race, "meter").unwrap();
/// assert!((meters.value().unwrap() - 201.168).abs() < 1e-9);
/// ```
pub struct UnitCatalog {
    config: CatalogConfig,
    table: RwLock<Arc<UnitTable>>,
    cache: SkipMap<String, Arc<Unit>>,
    hits: AtomicU64,
    misses: AtomicU64,
    resolutions: AtomicU64,
    cache_full_reported: AtomicBool,
    default_system: RwLock<UnitSystem>,
    event_handler: Arc<dyn CatalogEventHandler>,
}

impl UnitCatalog {
    /// A catalog with the default configuration and the builtin units.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Self::with_event_handler(config, Arc::new(NoOpEventHandler))
    }

    pub fn with_event_handler(
        config: CatalogConfig,
        event_handler: Arc<dyn CatalogEventHandler>,
    ) -> Self {
        let default_system = config.unit_system;
        let table = UnitTable::builtin(config.binary_prefixes);
        Self {
            config,
            table: RwLock::new(Arc::new(table)),
            cache: SkipMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            resolutions: AtomicU64::new(0),
            cache_full_reported: AtomicBool::new(false),
            default_system: RwLock::new(default_system),
            event_handler,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn snapshot(&self) -> Arc<UnitTable> {
        Arc::clone(&self.table.read())
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parse a unit expression into its canonical unit.
    ///
    /// # Errors
    /// * `UnitNotFound` with suggestions when a token names no unit
    /// * `UnitParse` for malformed input or an offset unit in a compound
    pub fn parse(&self, input: &str) -> UnitResult<Arc<Unit>> {
        let result = self.parse_cached(input);
        if let Err(err) = &result {
            self.event_handler.on_event(CatalogEvent::ParseFailed {
                input: input.to_string(),
                reason: err.to_string(),
            });
        }
        result
    }

    fn parse_cached(&self, input: &str) -> UnitResult<Arc<Unit>> {
        let tokens = tokenize(input)?;
        let key = normalized(&tokens);

        if self.config.cache_enabled {
            if let Some(entry) = self.cache.get(key.as_str()) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key = %key, "unit cache hit");
                self.event_handler.on_event(CatalogEvent::CacheHit { key });
                return Ok(Arc::clone(entry.value()));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        self.event_handler
            .on_event(CatalogEvent::CacheMiss { key: key.clone() });

        let table = self.snapshot();
        let expr = UnitExpr::parse_tokens(input, &tokens)?;
        let resolver = SnapshotResolver {
            catalog: self,
            table: &table,
        };
        let unit = expr.evaluate(&resolver).map_err(|err| match err {
            UnitError::UnitParse { reason, .. } => UnitError::parse(input, reason),
            other => other,
        })?;

        let unit = Arc::new(unit);
        self.remember(key, &unit);
        Ok(unit)
    }

    fn remember(&self, key: String, unit: &Arc<Unit>) {
        if !self.config.cache_enabled {
            return;
        }
        let canonical = normalize(unit.name()).ok().filter(|c| *c != key);
        for key in std::iter::once(key).chain(canonical) {
            if let Some(capacity) = self.config.cache_capacity {
                if self.cache.len() >= capacity {
                    if !self.cache_full_reported.swap(true, Ordering::Relaxed) {
                        warn!(capacity, "unit cache full; new entries are not cached");
                        self.event_handler
                            .on_event(CatalogEvent::CacheFull { capacity });
                    }
                    return;
                }
            }
            debug!(key = %key, unit = unit.name(), "caching unit");
            self.cache.insert(key, Arc::clone(unit));
        }
    }

    /// Resolve one atomic token (no operators).
    pub fn resolve(&self, token: &str) -> UnitResult<Arc<Unit>> {
        self.resolve_in(&self.snapshot(), token)
    }

    fn resolve_in(&self, table: &UnitTable, token: &str) -> UnitResult<Arc<Unit>> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        match self.lookup(table, token) {
            Some(unit) => {
                trace!(token, unit = unit.name(), "resolved unit");
                Ok(Arc::new(unit))
            },
            None => Err(UnitError::UnitNotFound {
                name: token.to_string(),
                suggestions: self.suggest_in(table, token),
            }),
        }
    }

    /// Exact, then prefixed, then case-insensitive.
    fn lookup(&self, table: &UnitTable, token: &str) -> Option<Unit> {
        if let Some(index) = table.exact_index(token) {
            return Some(table.definitions[index].unit());
        }
        if let Some(unit) = Self::lookup_prefixed(table, token) {
            return Some(unit);
        }
        if self.config.case_insensitive_fallback {
            return Self::lookup_case_insensitive(table, token);
        }
        None
    }

    fn lookup_prefixed(table: &UnitTable, token: &str) -> Option<Unit> {
        split_prefixes(token).into_iter().find_map(|split| {
            let index = match split.form {
                PrefixForm::Name => table.names.get(split.remainder),
                PrefixForm::Symbol => table.symbols.get(split.remainder),
            }?;
            let definition = &table.definitions[*index];
            definition
                .prefixable
                .then(|| definition.prefixed(split.prefix))
        })
    }

    fn lookup_case_insensitive(table: &UnitTable, token: &str) -> Option<Unit> {
        let lower = token.to_lowercase();
        if let Some(definition) = table.unique_lowercase(&lower) {
            return Some(definition.unit());
        }
        let found = split_prefixes(&lower)
            .into_iter()
            .filter(|split| split.form == PrefixForm::Name)
            .find_map(|split| {
                let definition = table.unique_lowercase(split.remainder)?;
                definition
                    .prefixable
                    .then(|| definition.prefixed(split.prefix))
            });
        found
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a custom unit from `"<number> <unit expression>"`.
    ///
    /// # Example
    /// ```
    /// use unit_engine::prelude::*;
    ///
    /// let catalog = UnitCatalog::new();
    /// let furlong = catalog.define("furlong", "220 yard").unwrap();
    /// assert!((furlong.factor() - 201.168).abs() < 1e-9);
    /// ```
    ///
    /// # Errors
    /// * `Registry` if the name already resolves or is not an identifier,
    ///   or the reference unit carries an offset
    /// * `InvalidValue` if the number is not finite and positive
    /// * any parse error of the reference expression
    pub fn define(&self, name: &str, definition: &str) -> UnitResult<Arc<Unit>> {
        self.register(name, None, definition)
    }

    /// As [`UnitCatalog::define`], also registering a symbol.
    pub fn define_with_symbol(
        &self,
        name: &str,
        symbol: &str,
        definition: &str,
    ) -> UnitResult<Arc<Unit>> {
        self.register(name, Some(symbol), definition)
    }

    fn register(&self, name: &str, symbol: Option<&str>, definition: &str) -> UnitResult<Arc<Unit>> {
        check_spelling(name)?;
        if let Some(symbol) = symbol {
            check_spelling(symbol)?;
            if symbol == name {
                return Err(UnitError::registry(name, "symbol must differ from the name"));
            }
        }

        let (value, expression) = split_definition(name, definition)?;
        let reference = self.parse(expression)?;
        if reference.is_affine() {
            return Err(UnitError::registry(
                name,
                format!("cannot be defined in terms of offset unit '{}'", reference.name()),
            ));
        }
        let factor = value * reference.factor();
        if !factor.is_finite() || factor <= 0.0 {
            return Err(UnitError::invalid_value(format!(
                "unit '{}' would have factor {}",
                name, factor
            )));
        }

        let entry = UnitDefinition {
            name: Arc::from(name),
            symbol: symbol.map(Arc::from),
            aliases: Vec::new(),
            factor,
            offset: 0.0,
            dimension: reference.dimension(),
            prefixable: false,
            builtin: false,
        };
        let unit = Arc::new(entry.unit());

        {
            let mut guard = self.table.write();
            self.ensure_unclaimed(&guard, name)?;
            if let Some(symbol) = symbol {
                self.ensure_unclaimed(&guard, symbol)?;
            }
            let mut next = UnitTable::clone(&guard);
            next.insert(entry);
            *guard = Arc::new(next);
        }

        info!(name, factor, dimension = %unit.dimension(), "registered custom unit");
        self.event_handler.on_event(CatalogEvent::UnitRegistered {
            name: name.to_string(),
            symbol: symbol.map(str::to_string),
            factor,
        });
        Ok(unit)
    }

    /// Add another spelling for an already defined unit.
    ///
    /// `target` must name a catalog entry directly (a prefixed form such as
    /// `kilometer` is not an entry).
    pub fn alias(&self, alias: &str, target: &str) -> UnitResult<()> {
        check_spelling(alias)?;

        let canonical = {
            let mut guard = self.table.write();
            let index = self.entry_index(&guard, target, alias)?;
            self.ensure_unclaimed(&guard, alias)?;
            let mut next = UnitTable::clone(&guard);
            next.add_alias(Arc::from(alias), index);
            let canonical = next.definitions[index].name().to_string();
            *guard = Arc::new(next);
            canonical
        };

        info!(alias, target = %canonical, "registered unit alias");
        self.event_handler.on_event(CatalogEvent::AliasRegistered {
            alias: alias.to_string(),
            target: canonical,
        });
        Ok(())
    }

    /// Register the kibi through exbi multiples of an existing entry, e.g.
    /// `KiB` and `kibibyte` for `byte`.
    ///
    /// All multiples are added together or not at all; listeners receive
    /// them as one batch of `UnitRegistered` events.
    ///
    /// # Errors
    /// * `UnitNotFound` if `base` resolves to nothing
    /// * `Registry` if `base` is not a catalog entry, carries an offset, or
    ///   a multiple's spelling already resolves
    pub fn add_binary_prefixes(&self, base: &str) -> UnitResult<Vec<Arc<Unit>>> {
        let multiples = {
            let mut guard = self.table.write();
            let index = self.entry_index(&guard, base, base)?;
            let source = Arc::clone(&guard.definitions[index]);
            if source.offset() != 0.0 {
                return Err(UnitError::registry(base, "offset units take no binary prefixes"));
            }

            let multiples: Vec<UnitDefinition> =
                BINARY_PREFIXES.iter().map(|prefix| source.multiple(prefix)).collect();
            for multiple in &multiples {
                for spelling in multiple.spellings() {
                    self.ensure_unclaimed(&guard, spelling)?;
                }
            }

            let mut next = UnitTable::clone(&guard);
            for multiple in &multiples {
                next.insert(multiple.clone());
            }
            *guard = Arc::new(next);
            multiples
        };

        info!(base, count = multiples.len(), "registered binary multiples");
        let events = multiples
            .iter()
            .map(|multiple| CatalogEvent::UnitRegistered {
                name: multiple.name().to_string(),
                symbol: multiple.symbol().map(str::to_string),
                factor: multiple.factor(),
            })
            .collect();
        self.event_handler.on_events(events);

        Ok(multiples.iter().map(|multiple| Arc::new(multiple.unit())).collect())
    }

    /// Index of the entry `target` names directly. A missing target is
    /// reported with suggestions; a resolvable one is only not an entry.
    fn entry_index(&self, table: &UnitTable, target: &str, spelling: &str) -> UnitResult<usize> {
        match table.exact_index(target) {
            Some(index) => Ok(index),
            None => {
                self.resolve_in(table, target)?;
                Err(UnitError::registry(
                    spelling,
                    format!("'{}' is not a catalog entry", target),
                ))
            },
        }
    }

    fn ensure_unclaimed(&self, table: &UnitTable, spelling: &str) -> UnitResult<()> {
        match self.lookup(table, spelling) {
            Some(existing) => Err(UnitError::registry(
                spelling,
                format!("already resolves to '{}'", existing.name()),
            )),
            None => Ok(()),
        }
    }

    /// The catalog entry `name` refers to directly, if any.
    pub fn definition(&self, name: &str) -> Option<Arc<UnitDefinition>> {
        let table = self.snapshot();
        table
            .exact_index(name)
            .map(|index| Arc::clone(&table.definitions[index]))
    }

    /// Canonical names of every entry, sorted.
    pub fn unit_names(&self) -> Vec<String> {
        let table = self.snapshot();
        let mut names: Vec<String> = table
            .definitions
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Short symbol for a canonical atomic name, including prefixed names
    /// (`kilometer` gives `km`).
    pub fn symbol_for(&self, name: &str) -> Option<String> {
        let table = self.snapshot();
        if let Some(&index) = table.names.get(name) {
            return table.definitions[index].symbol().map(str::to_string);
        }
        split_prefixes(name)
            .into_iter()
            .filter(|split| split.form == PrefixForm::Name)
            .find_map(|split| {
                let definition = &table.definitions[*table.names.get(split.remainder)?];
                if !definition.prefixable {
                    return None;
                }
                let symbol = definition.symbol()?;
                Some(format!("{}{}", split.prefix.symbols[0], symbol))
            })
    }

    // ========================================================================
    // Quantities and Conversion
    // ========================================================================

    /// Build a quantity from a magnitude and a unit string.
    pub fn quantity(&self, magnitude: impl Into<Magnitude>, unit: &str) -> UnitResult<Quantity> {
        Quantity::new(magnitude, self.parse(unit)?)
    }

    /// Convert a quantity into the unit `target` parses to.
    ///
    /// Long arrays are converted with the parallel kernel once they reach
    /// the configured threshold.
    pub fn convert(&self, quantity: &Quantity, target: &str) -> UnitResult<Quantity> {
        let target = self.parse(target)?;
        let conversion = Conversion::between(quantity.unit(), &target)?;
        let kernel = select_kernel(quantity.len(), self.config.parallel_threshold);
        let magnitude = conversion.apply_with(quantity.magnitude(), kernel)?;
        Quantity::new(magnitude, target)
    }

    /// Convert one number between two unit strings.
    pub fn convert_value(&self, value: f64, from: &str, to: &str) -> UnitResult<f64> {
        let from = self.parse(from)?;
        let to = self.parse(to)?;
        Magnitude::Scalar(value).validate()?;
        let converted = Conversion::between(&from, &to)?.apply_scalar(value);
        Magnitude::Scalar(converted).validate()?;
        Ok(converted)
    }

    // ========================================================================
    // Validation Helpers
    // ========================================================================

    pub fn is_valid(&self, input: &str) -> bool {
        self.parse(input).is_ok()
    }

    /// `Ok(())` if `input` parses, otherwise the parse error.
    pub fn validate(&self, input: &str) -> UnitResult<()> {
        self.parse(input).map(|_| ())
    }

    /// Known spellings close to `token`.
    pub fn suggest(&self, token: &str) -> Vec<String> {
        self.suggest_in(&self.snapshot(), token)
    }

    fn suggest_in(&self, table: &UnitTable, token: &str) -> Vec<String> {
        suggest::rank(
            token,
            table.spellings(),
            self.config.max_suggestions,
            self.config.max_suggestion_distance,
        )
    }

    /// `Ok(())` when both expressions share a dimension.
    ///
    /// # Errors
    /// `Dimensionality` naming both units, or any parse error.
    pub fn check_compatibility(&self, a: &str, b: &str) -> UnitResult<()> {
        let a = self.parse(a)?;
        let b = self.parse(b)?;
        if a.is_compatible_with(&b) {
            Ok(())
        } else {
            Err(UnitError::dimensionality(&a, &b, "compare"))
        }
    }

    // ========================================================================
    // Cache and Context
    // ========================================================================

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            entries: self.cache.len(),
        }
    }

    /// Drop every cached entry; counters are kept.
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.cache_full_reported.store(false, Ordering::Relaxed);
    }

    pub fn default_system(&self) -> UnitSystem {
        *self.default_system.read()
    }

    pub fn set_default_system(&self, system: UnitSystem) {
        let previous = std::mem::replace(&mut *self.default_system.write(), system);
        if previous != system {
            info!(from = previous.name(), to = system.name(), "default unit system changed");
            self.event_handler
                .on_event(CatalogEvent::DefaultSystemChanged {
                    previous,
                    current: system,
                });
        }
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves atoms against one table snapshot for the length of a parse.
struct SnapshotResolver<'a> {
    catalog: &'a UnitCatalog,
    table: &'a UnitTable,
}

impl AtomResolver for SnapshotResolver<'_> {
    fn resolve_atom(&self, token: &str) -> UnitResult<Arc<Unit>> {
        self.catalog.resolve_in(self.table, token)
    }
}

/// A registrable spelling is exactly one identifier token.
fn check_spelling(spelling: &str) -> UnitResult<()> {
    match tokenize(spelling).ok().as_deref() {
        Some([Token::Ident(ident)]) if ident == spelling => Ok(()),
        _ => Err(UnitError::registry(spelling, "not a valid unit identifier")),
    }
}

/// Split `"220 yard"` into `(220.0, "yard")`; a missing number means 1.
fn split_definition<'a>(name: &str, definition: &'a str) -> UnitResult<(f64, &'a str)> {
    let definition = definition.trim();
    let (head, rest) = match definition.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (definition, ""),
    };
    match head.parse::<f64>() {
        Ok(value) => {
            if !value.is_finite() || value <= 0.0 {
                return Err(UnitError::invalid_value(format!(
                    "definition of '{}' must scale by a finite positive number, got {}",
                    name, head
                )));
            }
            if rest.is_empty() {
                return Err(UnitError::parse(definition, "definition needs a reference unit"));
            }
            Ok((value, rest))
        },
        Err(_) => Ok((1.0, definition)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use parking_lot::Mutex;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_exact_resolution() {
        let catalog = UnitCatalog::new();
        assert_eq!(catalog.parse("meter").unwrap().name(), "meter");
        assert_eq!(catalog.parse("m").unwrap().name(), "meter");
        assert_eq!(catalog.parse("metres").unwrap().name(), "meter");
        assert_eq!(catalog.parse("°C").unwrap().name(), "celsius");
        assert_eq!(catalog.parse("C").unwrap().name(), "coulomb");
    }

    #[test]
    fn test_prefix_decomposition() {
        let catalog = UnitCatalog::new();

        let km = catalog.parse("km").unwrap();
        assert_eq!(km.name(), "kilometer");
        assert_eq!(km.factor(), 1000.0);

        let kg = catalog.parse("kilogram").unwrap();
        assert_eq!(kg.name(), "kilogram");
        assert_eq!(kg.factor(), 1.0);

        assert_eq!(catalog.parse("kilometers").unwrap().name(), "kilometer");
        assert_eq!(catalog.parse("µs").unwrap().name(), "microsecond");
        assert_eq!(catalog.parse("kWh").unwrap().name(), "kilowatt_hour");
    }

    #[test]
    fn test_prefix_needs_matching_form() {
        let catalog = UnitCatalog::new();
        // symbol prefix with a full name, and name prefix with a symbol
        assert!(catalog.parse("kmeter").is_err());
        assert!(catalog.parse("kilom").is_err());
    }

    #[test]
    fn test_non_prefixable_units_reject_prefixes() {
        let catalog = UnitCatalog::new();
        let err = catalog.parse("kilomile").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnitNotFound);
        assert!(catalog.parse("kilocelsius").is_err());
    }

    #[test]
    fn test_exact_beats_prefix() {
        let catalog = UnitCatalog::new();
        assert_eq!(catalog.parse("min").unwrap().name(), "minute");
        assert_eq!(catalog.parse("ft").unwrap().name(), "foot");
        assert_eq!(catalog.parse("cd").unwrap().name(), "candela");
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let catalog = UnitCatalog::new();
        assert_eq!(catalog.parse("Meter").unwrap().name(), "meter");
        assert_eq!(catalog.parse("KILOMETER").unwrap().name(), "kilometer");

        let strict = UnitCatalog::with_config(
            CatalogConfig::default().with_case_insensitive_fallback(false),
        );
        assert!(strict.parse("Meter").is_err());
    }

    #[test]
    fn test_unknown_unit_suggestions() {
        let catalog = UnitCatalog::new();
        match catalog.parse("metr").unwrap_err() {
            UnitError::UnitNotFound { name, suggestions } => {
                assert_eq!(name, "metr");
                assert!(suggestions.len() <= 5);
                assert_eq!(&suggestions[..2], &["meter".to_string(), "metre".to_string()]);
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_suggestion_limit_from_config() {
        let catalog = UnitCatalog::with_config(CatalogConfig::default().with_max_suggestions(1));
        assert_eq!(catalog.suggest("metr"), vec!["meter".to_string()]);
    }

    #[test]
    fn test_compound_parse() {
        let catalog = UnitCatalog::new();
        let unit = catalog.parse("km/h").unwrap();
        assert_eq!(unit.name(), "kilometer / hour");
        assert_eq!(unit.dimension(), Dimension::VELOCITY);
        assert_close(unit.factor(), 1000.0 / 3600.0);
    }

    #[test]
    fn test_canonical_form_is_idempotent() {
        let catalog = UnitCatalog::new();
        for input in ["kg*m/s^2", "1/s", "m^(1/2)", "km/h", "degC", "N·m", "dimensionless"] {
            let first = catalog.parse(input).unwrap();
            let second = catalog.parse(first.name()).unwrap();
            assert_eq!(first.name(), second.name(), "input {}", input);
            assert_eq!(*first, *second);
        }
    }

    #[test]
    fn test_offset_unit_in_compound() {
        let catalog = UnitCatalog::new();
        for input in ["celsius^2", "degC/s", "m*°F"] {
            let err = catalog.parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnitParse);
            match err {
                UnitError::UnitParse { input: reported, .. } => assert_eq!(reported, input),
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_exponent_overflow_is_a_parse_error() {
        let catalog = UnitCatalog::new();
        for input in ["m^9223372036854775807*m", "m^(1/4294967296) * m^(1/4294967295)"] {
            match catalog.parse(input).unwrap_err() {
                UnitError::UnitParse { input: reported, .. } => assert_eq!(reported, input),
                other => panic!("unexpected error {:?}", other),
            }
        }
        assert_eq!(catalog.cache_stats().entries, 0);
        // the catalog keeps working
        assert_eq!(catalog.parse("m^2").unwrap().dimension(), Dimension::AREA);
    }

    #[test]
    fn test_cache_hits() {
        let catalog = UnitCatalog::new();
        catalog.parse("km / h").unwrap();
        let before = catalog.cache_stats();
        catalog.parse("km/h").unwrap();
        let after = catalog.cache_stats();

        assert_eq!(after.hits, before.hits + 1);
        assert_eq!(after.misses, before.misses);
        assert_eq!(after.resolutions, before.resolutions);
    }

    #[test]
    fn test_cache_holds_canonical_form() {
        let catalog = UnitCatalog::new();
        catalog.parse("km/h").unwrap();
        let before = catalog.cache_stats();
        catalog.parse("kilometer / hour").unwrap();
        assert_eq!(catalog.cache_stats().hits, before.hits + 1);
    }

    #[test]
    fn test_cache_returns_shared_unit() {
        let catalog = UnitCatalog::new();
        let first = catalog.parse("m/s").unwrap();
        let second = catalog.parse("m / s").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_capacity() {
        let catalog = UnitCatalog::with_config(CatalogConfig::default().with_cache_capacity(1));
        catalog.parse("m").unwrap();
        catalog.parse("s").unwrap();
        assert_eq!(catalog.cache_stats().entries, 1);
        // still parses correctly once full
        assert_eq!(catalog.parse("s").unwrap().name(), "second");
    }

    #[test]
    fn test_uncached() {
        let catalog = UnitCatalog::with_config(CatalogConfig::uncached());
        catalog.parse("m").unwrap();
        catalog.parse("m").unwrap();
        let stats = catalog.cache_stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_define_furlong() {
        let catalog = UnitCatalog::new();
        catalog.define("furlong", "220 yard").unwrap();
        assert_close(catalog.convert_value(1.0, "furlong", "meter").unwrap(), 201.168);
        assert!(!catalog.definition("furlong").unwrap().is_builtin());
    }

    #[test]
    fn test_define_with_symbol_and_compound_reference() {
        let catalog = UnitCatalog::new();
        let unit = catalog
            .define_with_symbol("smoot", "smt", "1.7018 meter")
            .unwrap();
        assert_eq!(unit.name(), "smoot");
        assert_eq!(catalog.parse("smt").unwrap().name(), "smoot");

        let flow = catalog.define("cusec", "0.028316846592 m^3/s").unwrap();
        assert_eq!(flow.dimension(), Dimension::VOLUME / Dimension::TIME);
    }

    #[test]
    fn test_define_rejects_collisions() {
        let catalog = UnitCatalog::new();
        for name in ["meter", "m", "metre", "km", "kilometer", "Meter"] {
            let err = catalog.define(name, "2 meter").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Registry, "name {}", name);
        }
        catalog.define("furlong", "220 yard").unwrap();
        assert_eq!(
            catalog.define("furlong", "1 meter").unwrap_err().kind(),
            ErrorKind::Registry
        );
    }

    #[test]
    fn test_define_rejects_bad_input() {
        let catalog = UnitCatalog::new();
        assert_eq!(catalog.define("my unit", "1 m").unwrap_err().kind(), ErrorKind::Registry);
        assert_eq!(catalog.define("warm", "2 celsius").unwrap_err().kind(), ErrorKind::Registry);
        assert_eq!(catalog.define("nil", "0 meter").unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(catalog.define("neg", "-1 meter").unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(catalog.define("blip", "2 blorp").unwrap_err().kind(), ErrorKind::UnitNotFound);
        assert_eq!(catalog.define("lonely", "3").unwrap_err().kind(), ErrorKind::UnitParse);
    }

    #[test]
    fn test_failed_define_leaves_catalog_unchanged() {
        let catalog = UnitCatalog::new();
        let before = catalog.unit_names().len();
        let _ = catalog.define("warm", "2 celsius");
        assert_eq!(catalog.unit_names().len(), before);
        assert!(!catalog.is_valid("warm"));
    }

    #[test]
    fn test_catalogs_are_independent() {
        let a = UnitCatalog::new();
        let b = UnitCatalog::new();
        a.define("furlong", "220 yard").unwrap();
        assert!(a.is_valid("furlong"));
        assert!(!b.is_valid("furlong"));
    }

    #[test]
    fn test_alias() {
        let catalog = UnitCatalog::new();
        catalog.alias("klick", "kilometer").unwrap_err();
        catalog.alias("metro", "meter").unwrap();
        assert_eq!(catalog.parse("metro").unwrap().name(), "meter");
        // prefixable through the new alias
        assert_eq!(catalog.parse("kilometro").unwrap().name(), "kilometer");

        assert_eq!(catalog.alias("m", "second").unwrap_err().kind(), ErrorKind::Registry);
        assert_eq!(catalog.alias("x", "blorp").unwrap_err().kind(), ErrorKind::UnitNotFound);
    }

    #[test]
    fn test_symbol_for() {
        let catalog = UnitCatalog::new();
        assert_eq!(catalog.symbol_for("meter").as_deref(), Some("m"));
        assert_eq!(catalog.symbol_for("kilometer").as_deref(), Some("km"));
        assert_eq!(catalog.symbol_for("microsecond").as_deref(), Some("µs"));
        assert_eq!(catalog.symbol_for("acre"), None);
    }

    #[test]
    fn test_validation_helpers() {
        let catalog = UnitCatalog::new();
        assert!(catalog.is_valid("kg*m/s^2"));
        assert!(!catalog.is_valid("kg*"));
        assert_eq!(catalog.validate("blorp").unwrap_err().kind(), ErrorKind::UnitNotFound);

        assert!(catalog.check_compatibility("N", "kg*m/s^2").is_ok());
        let err = catalog.check_compatibility("meter", "second").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dimensionality);
    }

    #[test]
    fn test_convert_km_to_mile() {
        let catalog = UnitCatalog::new();
        let distance = catalog.quantity(1.0, "km").unwrap();
        let miles = catalog.convert(&distance, "mi").unwrap();
        assert!((miles.value().unwrap() - 0.621371).abs() < 1e-6);
        assert_eq!(miles.unit().name(), "mile");
    }

    #[test]
    fn test_convert_temperature() {
        let catalog = UnitCatalog::new();
        assert_close(catalog.convert_value(0.0, "degC", "degF").unwrap(), 32.0);
        assert_close(catalog.convert_value(0.0, "°C", "K").unwrap(), 273.15);
        assert_close(catalog.convert_value(100.0, "celsius", "fahrenheit").unwrap(), 212.0);
        assert_close(catalog.convert_value(0.0, "rankine", "kelvin").unwrap(), 0.0);
    }

    #[test]
    fn test_convert_uses_parallel_threshold() {
        let catalog =
            UnitCatalog::with_config(CatalogConfig::default().with_parallel_threshold(4));
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let lengths = catalog.quantity(values, "km").unwrap();
        let meters = catalog.convert(&lengths, "m").unwrap();
        assert_eq!(meters.len(), 100);
        assert_eq!(meters.magnitude().get(99), Some(99_000.0));
    }

    #[test]
    fn test_default_system() {
        let catalog = UnitCatalog::new();
        assert_eq!(catalog.default_system(), UnitSystem::Si);
        catalog.set_default_system(UnitSystem::Imperial);
        assert_eq!(catalog.default_system(), UnitSystem::Imperial);
    }

    struct RecordingHandler {
        events: Mutex<Vec<CatalogEvent>>,
    }

    impl CatalogEventHandler for RecordingHandler {
        fn on_event(&self, event: CatalogEvent) {
            self.events.lock().push(event);
        }
    }

    #[test]
    fn test_events_emitted() {
        let handler = Arc::new(RecordingHandler {
            events: Mutex::new(Vec::new()),
        });
        let catalog = UnitCatalog::with_event_handler(CatalogConfig::default(), handler.clone());

        catalog.parse("m").unwrap();
        catalog.parse("m").unwrap();
        let _ = catalog.parse("blorp");
        catalog.define("furlong", "220 yard").unwrap();
        catalog.set_default_system(UnitSystem::Cgs);

        let events = handler.events.lock();
        assert!(matches!(events[0], CatalogEvent::CacheMiss { .. }));
        assert!(matches!(events[1], CatalogEvent::CacheHit { .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, CatalogEvent::ParseFailed { input, .. } if input == "blorp")));
        assert!(events
            .iter()
            .any(|e| matches!(e, CatalogEvent::UnitRegistered { name, .. } if name == "furlong")));
        assert!(matches!(
            events.last(),
            Some(CatalogEvent::DefaultSystemChanged {
                current: UnitSystem::Cgs,
                ..
            })
        ));
    }

    #[derive(Default)]
    struct BatchHandler {
        batches: Mutex<Vec<Vec<CatalogEvent>>>,
    }

    impl CatalogEventHandler for BatchHandler {
        fn on_event(&self, event: CatalogEvent) {
            self.batches.lock().push(vec![event]);
        }

        fn on_events(&self, events: Vec<CatalogEvent>) {
            self.batches.lock().push(events);
        }
    }

    #[test]
    fn test_binary_prefixes_from_config() {
        let catalog = UnitCatalog::with_config(CatalogConfig::default().with_binary_prefixes(true));
        assert_close(catalog.convert_value(1.0, "KiB", "bit").unwrap(), 8192.0);
        assert_close(catalog.convert_value(1.0, "MiB", "MB").unwrap(), 1.048576);
        assert_close(catalog.convert_value(1.0, "gibibits", "Mib").unwrap(), 1024.0);
        assert_eq!(catalog.parse("EiB").unwrap().name(), "exbibyte");
        assert!(catalog.definition("tebibyte").unwrap().is_builtin());

        let plain = UnitCatalog::new();
        assert!(!plain.is_valid("KiB"));
        assert_close(plain.convert_value(1.0, "kB", "bit").unwrap(), 8000.0);
    }

    #[test]
    fn test_add_binary_prefixes_emits_one_batch() {
        let handler = Arc::new(BatchHandler::default());
        let catalog = UnitCatalog::with_event_handler(CatalogConfig::default(), handler.clone());

        let units = catalog.add_binary_prefixes("byte").unwrap();
        assert_eq!(units.len(), 6);
        assert_eq!(units[0].name(), "kibibyte");
        assert_close(units[0].factor(), 8192.0);
        assert_eq!(catalog.symbol_for("mebibyte").as_deref(), Some("MiB"));
        assert!(catalog.is_valid("pebibytes"));

        let batches = handler.batches.lock();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 6);
        assert!(matches!(
            &batches[0][1],
            CatalogEvent::UnitRegistered { name, symbol: Some(symbol), .. }
                if name == "mebibyte" && symbol == "MiB"
        ));
    }

    #[test]
    fn test_add_binary_prefixes_to_custom_unit() {
        let catalog = UnitCatalog::new();
        catalog.define_with_symbol("word", "wd", "16 bit").unwrap();
        catalog.add_binary_prefixes("word").unwrap();
        assert_close(catalog.convert_value(1.0, "Kiwd", "byte").unwrap(), 2048.0);
        assert!(!catalog.definition("kibiword").unwrap().is_builtin());
    }

    #[test]
    fn test_add_binary_prefixes_rejections() {
        let catalog = UnitCatalog::with_config(CatalogConfig::default().with_binary_prefixes(true));
        let err = catalog.add_binary_prefixes("byte").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Registry);

        let err = catalog.add_binary_prefixes("celsius").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Registry);

        let err = catalog.add_binary_prefixes("kilobyte").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Registry);

        let err = catalog.add_binary_prefixes("blorp").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnitNotFound);
    }

    #[test]
    fn test_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UnitCatalog>();
    }

    #[test]
    fn test_concurrent_parse_and_define() {
        let catalog = Arc::new(UnitCatalog::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    catalog.define(&format!("custom{}", i), "3 meter").unwrap();
                    for _ in 0..100 {
                        assert_eq!(catalog.parse("km/h").unwrap().name(), "kilometer / hour");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        for i in 0..4 {
            assert!(catalog.is_valid(&format!("custom{}", i)));
        }
    }
}
