//! Schema bootstrap
//!
//! Creates the four tables and the stored routines behind `/procedures`.
//! Every statement is idempotent, so this runs on each startup when enabled.

use deadpool_postgres::Pool;
use tracing::info;

pub const TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY,
    kind TEXT NOT NULL,
    brand TEXT NOT NULL,
    repair_price BIGINT NOT NULL
);

CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS technicians (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS service_records (
    id INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    technician_id INTEGER NOT NULL REFERENCES technicians(id),
    item_id INTEGER NOT NULL REFERENCES items(id),
    service_date DATE NOT NULL,
    repair_duration INTEGER NOT NULL,
    damage TEXT NOT NULL,
    extra_cost BIGINT NOT NULL DEFAULT 0,
    total_cost BIGINT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_brand ON items(brand);
"#;

pub const ITEM_ROUTINES: &str = r#"
CREATE OR REPLACE FUNCTION list_items() RETURNS SETOF items
LANGUAGE sql STABLE AS $$
    SELECT * FROM items ORDER BY id
$$;

CREATE OR REPLACE FUNCTION find_item(p_id INTEGER) RETURNS SETOF items
LANGUAGE sql STABLE AS $$
    SELECT * FROM items WHERE id = p_id
$$;

CREATE OR REPLACE FUNCTION items_by_brand(p_brand TEXT) RETURNS SETOF items
LANGUAGE sql STABLE AS $$
    SELECT * FROM items WHERE brand = p_brand ORDER BY id
$$;

CREATE OR REPLACE FUNCTION add_item(p_id INTEGER, p_kind TEXT, p_brand TEXT, p_price BIGINT)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    INSERT INTO items (id, kind, brand, repair_price) VALUES (p_id, p_kind, p_brand, p_price);
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION update_item(p_id INTEGER, p_kind TEXT, p_brand TEXT, p_price BIGINT)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    UPDATE items
    SET kind = COALESCE(p_kind, kind),
        brand = COALESCE(p_brand, brand),
        repair_price = COALESCE(p_price, repair_price)
    WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION delete_item(p_id INTEGER)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    DELETE FROM items WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;
"#;

pub const PEOPLE_ROUTINES: &str = r#"
CREATE OR REPLACE FUNCTION list_customers() RETURNS SETOF customers
LANGUAGE sql STABLE AS $$
    SELECT * FROM customers ORDER BY id
$$;

CREATE OR REPLACE FUNCTION find_customer(p_id INTEGER) RETURNS SETOF customers
LANGUAGE sql STABLE AS $$
    SELECT * FROM customers WHERE id = p_id
$$;

CREATE OR REPLACE FUNCTION add_customer(p_id INTEGER, p_name TEXT)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    INSERT INTO customers (id, name) VALUES (p_id, p_name);
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION update_customer(p_id INTEGER, p_name TEXT)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    UPDATE customers SET name = COALESCE(p_name, name) WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION delete_customer(p_id INTEGER)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    DELETE FROM customers WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION list_technicians() RETURNS SETOF technicians
LANGUAGE sql STABLE AS $$
    SELECT * FROM technicians ORDER BY id
$$;

CREATE OR REPLACE FUNCTION find_technician(p_id INTEGER) RETURNS SETOF technicians
LANGUAGE sql STABLE AS $$
    SELECT * FROM technicians WHERE id = p_id
$$;

CREATE OR REPLACE FUNCTION add_technician(p_id INTEGER, p_name TEXT)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    INSERT INTO technicians (id, name) VALUES (p_id, p_name);
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION update_technician(p_id INTEGER, p_name TEXT)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    UPDATE technicians SET name = COALESCE(p_name, name) WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION delete_technician(p_id INTEGER)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    DELETE FROM technicians WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;
"#;

pub const SERVICE_RECORD_ROUTINES: &str = r#"
CREATE OR REPLACE FUNCTION list_service_records() RETURNS SETOF service_records
LANGUAGE sql STABLE AS $$
    SELECT * FROM service_records ORDER BY id
$$;

CREATE OR REPLACE FUNCTION find_service_record(p_id INTEGER) RETURNS SETOF service_records
LANGUAGE sql STABLE AS $$
    SELECT * FROM service_records WHERE id = p_id
$$;

CREATE OR REPLACE FUNCTION add_service_record(
    p_id INTEGER, p_customer_id INTEGER, p_technician_id INTEGER, p_item_id INTEGER,
    p_service_date DATE, p_repair_duration INTEGER, p_damage TEXT,
    p_extra_cost BIGINT, p_total_cost BIGINT
)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    INSERT INTO service_records
        (id, customer_id, technician_id, item_id, service_date,
         repair_duration, damage, extra_cost, total_cost)
    VALUES
        (p_id, p_customer_id, p_technician_id, p_item_id, p_service_date,
         p_repair_duration, p_damage, p_extra_cost, p_total_cost);
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION update_service_record(
    p_id INTEGER, p_customer_id INTEGER, p_technician_id INTEGER, p_item_id INTEGER,
    p_service_date DATE, p_repair_duration INTEGER, p_damage TEXT,
    p_extra_cost BIGINT, p_total_cost BIGINT
)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    UPDATE service_records
    SET customer_id = COALESCE(p_customer_id, customer_id),
        technician_id = COALESCE(p_technician_id, technician_id),
        item_id = COALESCE(p_item_id, item_id),
        service_date = COALESCE(p_service_date, service_date),
        repair_duration = COALESCE(p_repair_duration, repair_duration),
        damage = COALESCE(p_damage, damage),
        extra_cost = COALESCE(p_extra_cost, extra_cost),
        total_cost = COALESCE(p_total_cost, total_cost)
    WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;

CREATE OR REPLACE FUNCTION delete_service_record(p_id INTEGER)
RETURNS INTEGER LANGUAGE plpgsql AS $$
DECLARE affected INTEGER;
BEGIN
    DELETE FROM service_records WHERE id = p_id;
    GET DIAGNOSTICS affected = ROW_COUNT;
    RETURN affected;
END
$$;
"#;

/// Create tables and routines if they don't exist
pub async fn ensure_schema(pool: &Pool) -> anyhow::Result<()> {
    let client = pool.get().await?;

    client.batch_execute(TABLES).await?;
    client.batch_execute(ITEM_ROUTINES).await?;
    client.batch_execute(PEOPLE_ROUTINES).await?;
    client.batch_execute(SERVICE_RECORD_ROUTINES).await?;

    info!("✅ Tables and stored routines initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries;
    use crate::store::Statements;

    /// Name of the routine a call statement invokes, e.g. `find_item`
    fn routine_name(call: &str) -> &str {
        let end = call.find('(').unwrap_or(call.len());
        let start = call[..end].rfind(' ').map(|i| i + 1).unwrap_or(0);
        &call[start..end]
    }

    fn defined(name: &str) -> bool {
        let needle = format!("FUNCTION {}(", name);
        [ITEM_ROUTINES, PEOPLE_ROUTINES, SERVICE_RECORD_ROUTINES]
            .iter()
            .any(|script| script.contains(&needle))
    }

    #[test]
    fn every_routine_call_has_a_definition() {
        let all: [Statements; 4] = [
            queries::ITEM_ROUTINES,
            queries::CUSTOMER_ROUTINES,
            queries::TECHNICIAN_ROUTINES,
            queries::SERVICE_RECORD_ROUTINES,
        ];
        for statements in all {
            for call in [
                statements.list,
                statements.get,
                statements.insert,
                statements.update,
                statements.delete,
            ] {
                let name = routine_name(call);
                assert!(defined(name), "routine {} is not defined", name);
            }
        }
        assert!(defined(routine_name(queries::ITEMS_BY_BRAND_ROUTINE)));
    }
}
