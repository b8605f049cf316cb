//! SQL statements and routine calls
//!
//! Contains all statements used by the record stores. Routine names match the
//! functions created by [`crate::db::schema`].

use crate::store::Statements;

pub const ITEM_SQL: Statements = Statements {
    list: "SELECT id, kind, brand, repair_price FROM items ORDER BY id",
    get: "SELECT id, kind, brand, repair_price FROM items WHERE id = $1",
    insert: "INSERT INTO items (id, kind, brand, repair_price) VALUES ($1, $2, $3, $4)",
    update: r#"
        UPDATE items
        SET kind = COALESCE($2, kind),
            brand = COALESCE($3, brand),
            repair_price = COALESCE($4, repair_price)
        WHERE id = $1
    "#,
    delete: "DELETE FROM items WHERE id = $1",
};

pub const ITEM_ROUTINES: Statements = Statements {
    list: "SELECT * FROM list_items()",
    get: "SELECT * FROM find_item($1)",
    insert: "SELECT add_item($1, $2, $3, $4)",
    update: "SELECT update_item($1, $2, $3, $4)",
    delete: "SELECT delete_item($1)",
};

pub const ITEMS_BY_BRAND_SQL: &str =
    "SELECT id, kind, brand, repair_price FROM items WHERE brand = $1 ORDER BY id";

pub const ITEMS_BY_BRAND_ROUTINE: &str = "SELECT * FROM items_by_brand($1)";

pub const CUSTOMER_SQL: Statements = Statements {
    list: "SELECT id, name FROM customers ORDER BY id",
    get: "SELECT id, name FROM customers WHERE id = $1",
    insert: "INSERT INTO customers (id, name) VALUES ($1, $2)",
    update: "UPDATE customers SET name = COALESCE($2, name) WHERE id = $1",
    delete: "DELETE FROM customers WHERE id = $1",
};

pub const CUSTOMER_ROUTINES: Statements = Statements {
    list: "SELECT * FROM list_customers()",
    get: "SELECT * FROM find_customer($1)",
    insert: "SELECT add_customer($1, $2)",
    update: "SELECT update_customer($1, $2)",
    delete: "SELECT delete_customer($1)",
};

pub const TECHNICIAN_SQL: Statements = Statements {
    list: "SELECT id, name FROM technicians ORDER BY id",
    get: "SELECT id, name FROM technicians WHERE id = $1",
    insert: "INSERT INTO technicians (id, name) VALUES ($1, $2)",
    update: "UPDATE technicians SET name = COALESCE($2, name) WHERE id = $1",
    delete: "DELETE FROM technicians WHERE id = $1",
};

pub const TECHNICIAN_ROUTINES: Statements = Statements {
    list: "SELECT * FROM list_technicians()",
    get: "SELECT * FROM find_technician($1)",
    insert: "SELECT add_technician($1, $2)",
    update: "SELECT update_technician($1, $2)",
    delete: "SELECT delete_technician($1)",
};

pub const SERVICE_RECORD_SQL: Statements = Statements {
    list: r#"
        SELECT id, customer_id, technician_id, item_id, service_date,
               repair_duration, damage, extra_cost, total_cost
        FROM service_records
        ORDER BY id
    "#,
    get: r#"
        SELECT id, customer_id, technician_id, item_id, service_date,
               repair_duration, damage, extra_cost, total_cost
        FROM service_records
        WHERE id = $1
    "#,
    insert: r#"
        INSERT INTO service_records
            (id, customer_id, technician_id, item_id, service_date,
             repair_duration, damage, extra_cost, total_cost)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    "#,
    update: r#"
        UPDATE service_records
        SET customer_id = COALESCE($2, customer_id),
            technician_id = COALESCE($3, technician_id),
            item_id = COALESCE($4, item_id),
            service_date = COALESCE($5, service_date),
            repair_duration = COALESCE($6, repair_duration),
            damage = COALESCE($7, damage),
            extra_cost = COALESCE($8, extra_cost),
            total_cost = COALESCE($9, total_cost)
        WHERE id = $1
    "#,
    delete: "DELETE FROM service_records WHERE id = $1",
};

pub const SERVICE_RECORD_ROUTINES: Statements = Statements {
    list: "SELECT * FROM list_service_records()",
    get: "SELECT * FROM find_service_record($1)",
    insert: "SELECT add_service_record($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    update: "SELECT update_service_record($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    delete: "SELECT delete_service_record($1)",
};

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(sql: &str) -> usize {
        (1..=20)
            .take_while(|n| sql.contains(&format!("${}", n)))
            .count()
    }

    #[test]
    fn both_strategies_bind_the_same_parameters() {
        for (sql, routines) in [
            (ITEM_SQL, ITEM_ROUTINES),
            (CUSTOMER_SQL, CUSTOMER_ROUTINES),
            (TECHNICIAN_SQL, TECHNICIAN_ROUTINES),
            (SERVICE_RECORD_SQL, SERVICE_RECORD_ROUTINES),
        ] {
            assert_eq!(placeholders(sql.list), placeholders(routines.list));
            assert_eq!(placeholders(sql.get), 1);
            assert_eq!(placeholders(routines.get), 1);
            assert_eq!(placeholders(sql.insert), placeholders(routines.insert));
            assert_eq!(placeholders(sql.update), placeholders(routines.update));
            assert_eq!(placeholders(sql.delete), 1);
            assert_eq!(placeholders(routines.delete), 1);
        }
    }

    #[test]
    fn list_statements_take_no_parameters() {
        assert_eq!(placeholders(ITEM_SQL.list), 0);
        assert_eq!(placeholders(SERVICE_RECORD_ROUTINES.list), 0);
        assert_eq!(placeholders(ITEMS_BY_BRAND_SQL), 1);
        assert_eq!(placeholders(ITEMS_BY_BRAND_ROUTINE), 1);
    }
}
