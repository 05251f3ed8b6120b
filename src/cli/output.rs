//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::domain::models::engine::{
    CONFIG_CENTER_KEY, DASHBOARD_SERVICE_KEY, SERVICE_CENTER_KEY,
};
use crate::domain::models::EngineEndpoints;

/// Result of a command, printable as text or JSON.
pub trait CommandOutput: Serialize {
    /// Text for a terminal
    fn to_human(&self) -> String;
    /// Value printed with `--json`
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` to stdout in the selected format.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Two-column table of the discovered endpoints and the config keys they
/// are written to.
pub fn endpoints_table(endpoints: &EngineEndpoints) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(vec![
            Cell::new("Service").add_attribute(Attribute::Bold),
            Cell::new("Address").add_attribute(Attribute::Bold),
            Cell::new("Config key").add_attribute(Attribute::Bold),
        ]);

    for (service, address, key) in [
        (SERVICE_CENTER_KEY, &endpoints.service_center, "servicecomb.registry.address"),
        (CONFIG_CENTER_KEY, &endpoints.config_center, "servicecomb.config.client.serverUri"),
        (DASHBOARD_SERVICE_KEY, &endpoints.dashboard_service, "servicecomb.monitor.client.serverUri"),
    ] {
        table.add_row(vec![Cell::new(service), Cell::new(address), Cell::new(key)]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_table_lists_every_service() {
        let table = endpoints_table(&EngineEndpoints {
            service_center: "https://10.0.0.1:30100".to_string(),
            config_center: "https://10.0.0.1:30110".to_string(),
            dashboard_service: "https://10.0.0.1:30120".to_string(),
        });

        assert!(table.contains("serviceCenter"));
        assert!(table.contains("https://10.0.0.1:30110"));
        assert!(table.contains("servicecomb.monitor.client.serverUri"));
    }
}
