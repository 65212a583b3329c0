//! The additive column sets the application expects on each table.
//!
//! One declarative list per table. The migrator adds whatever is
//! missing and never alters or removes anything, so these lists only
//! ever grow: when a model gains a field, its column goes here and the
//! next `tend migrate` brings every environment up to date.

use tend::{ColType, ColumnSpec};

/// Desired additive columns, one entry per table.
pub fn desired_schema() -> Vec<(&'static str, Vec<ColumnSpec>)> {
    vec![
        ("user", user_columns()),
        ("vehicle", vehicle_columns()),
        ("service_record", service_record_columns()),
    ]
}

/// Account locality, workshop affiliation, and password-reset fields.
fn user_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text("municipality"),
        ColumnSpec::new("ward_no", ColType::Integer),
        ColumnSpec::new("workshop_name", ColType::Varchar(255)),
        ColumnSpec::text("reset_token_hash"),
        ColumnSpec::new("reset_token_expires_at", ColType::Timestamp),
    ]
}

/// Electric and fuel vehicle specification fields.
fn vehicle_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("battery_capacity_kwh", ColType::DoublePrecision),
        ColumnSpec::new("electric_range_km", ColType::Integer),
        ColumnSpec::new("charging_port_type", ColType::Varchar(20)),
        ColumnSpec::new("fast_charging_supported", ColType::Boolean),
        ColumnSpec::new("motor_power_kw", ColType::DoublePrecision),
        ColumnSpec::new("engine_displacement_cc", ColType::Integer),
        ColumnSpec::new("fuel_tank_capacity_l", ColType::DoublePrecision),
        ColumnSpec::new("mileage_kmpl", ColType::DoublePrecision),
        ColumnSpec::new("emission_standard", ColType::Varchar(10)),
    ]
}

/// Odometer capture on service records.
fn service_record_columns() -> Vec<ColumnSpec> {
    vec![ColumnSpec::new("odometer_reading", ColType::Integer)]
}
