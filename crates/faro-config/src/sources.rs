//! Built-in data source labels and prefixes.

use std::collections::BTreeMap;

/// The default data sources. Each entry maps a label to the object-store
/// prefix holding its raw record files. Override per deployment via
/// `FARO_SOURCES__<LABEL>` or the `[sources]` TOML table.
#[must_use]
pub fn default_sources() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "subsidio".to_string(),
            "comercial/mensajeria/subsidio/".to_string(),
        ),
        (
            "no_subsidio".to_string(),
            "comercial/mensajeria/no_subsidio/".to_string(),
        ),
        (
            "recomendador".to_string(),
            "comercial/mensajeria/recomendador/".to_string(),
        ),
    ])
}
