use crate::models::{
    LinkedOrderHeader, OrderHeaderRow, OrderKind, OrderLineRow, SupplierRecord, TradeSide,
    TransactionRecord,
};
use sqlx::PgPool;

const PURCHASE_ORDER_HEADER: &str = r#"
    SELECT name, title, NULL::varchar AS order_type,
           supplier AS party, supplier_name AS party_name, currency,
           transaction_date, schedule_date AS due_date,
           status, docstatus,
           COALESCE(total, 0) AS total,
           0::numeric AS per_ordered,
           COALESCE(per_received, 0) AS per_fulfilled,
           COALESCE(per_billed, 0) AS per_billed
    FROM "tabPurchase Order"
    WHERE name = $1
"#;

const SALES_ORDER_HEADER: &str = r#"
    SELECT name, title, order_type,
           customer AS party, customer_name AS party_name, currency,
           transaction_date, delivery_date AS due_date,
           status, docstatus,
           COALESCE(total, 0) AS total,
           0::numeric AS per_ordered,
           COALESCE(per_delivered, 0) AS per_fulfilled,
           COALESCE(per_billed, 0) AS per_billed
    FROM "tabSales Order"
    WHERE name = $1
"#;

const MATERIAL_REQUEST_HEADER: &str = r#"
    SELECT name, title, material_request_type AS order_type,
           customer AS party, NULL::varchar AS party_name, NULL::varchar AS currency,
           transaction_date, schedule_date AS due_date,
           status, docstatus,
           0::numeric AS total,
           COALESCE(per_ordered, 0) AS per_ordered,
           COALESCE(per_received, 0) AS per_fulfilled,
           0::numeric AS per_billed
    FROM "tabMaterial Request"
    WHERE name = $1
"#;

const PURCHASE_ORDER_LINES: &str = r#"
    SELECT idx, item_code, item_name, item_group, uom,
           COALESCE(qty, 0) AS qty,
           COALESCE(received_qty, 0) AS fulfilled_qty,
           0::numeric AS ordered_qty,
           COALESCE(billed_amt, 0) AS billed_amt,
           COALESCE(rate, 0) AS rate,
           COALESCE(amount, 0) AS amount
    FROM "tabPurchase Order Item"
    WHERE parent = $1
    ORDER BY idx
"#;

const SALES_ORDER_LINES: &str = r#"
    SELECT idx, item_code, item_name, item_group, uom,
           COALESCE(qty, 0) AS qty,
           COALESCE(delivered_qty, 0) AS fulfilled_qty,
           0::numeric AS ordered_qty,
           COALESCE(billed_amt, 0) AS billed_amt,
           COALESCE(rate, 0) AS rate,
           COALESCE(amount, 0) AS amount
    FROM "tabSales Order Item"
    WHERE parent = $1
    ORDER BY idx
"#;

const MATERIAL_REQUEST_LINES: &str = r#"
    SELECT idx, item_code, item_name, item_group, uom,
           COALESCE(qty, 0) AS qty,
           COALESCE(received_qty, 0) AS fulfilled_qty,
           COALESCE(ordered_qty, 0) AS ordered_qty,
           0::numeric AS billed_amt,
           COALESCE(rate, 0) AS rate,
           COALESCE(amount, 0) AS amount
    FROM "tabMaterial Request Item"
    WHERE parent = $1
    ORDER BY idx
"#;

/// 查询订单主表 (三种订单映射到统一列名)
pub async fn get_order_header(
    pool: &PgPool,
    kind: OrderKind,
    name: &str,
) -> Result<Option<OrderHeaderRow>, sqlx::Error> {
    let sql = match kind {
        OrderKind::PurchaseOrder => PURCHASE_ORDER_HEADER,
        OrderKind::SalesOrder => SALES_ORDER_HEADER,
        OrderKind::MaterialRequest => MATERIAL_REQUEST_HEADER,
    };
    sqlx::query_as::<_, OrderHeaderRow>(sql)
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// 查询订单明细
pub async fn list_order_lines(
    pool: &PgPool,
    kind: OrderKind,
    name: &str,
) -> Result<Vec<OrderLineRow>, sqlx::Error> {
    let sql = match kind {
        OrderKind::PurchaseOrder => PURCHASE_ORDER_LINES,
        OrderKind::SalesOrder => SALES_ORDER_LINES,
        OrderKind::MaterialRequest => MATERIAL_REQUEST_LINES,
    };
    sqlx::query_as::<_, OrderLineRow>(sql)
        .bind(name)
        .fetch_all(pool)
        .await
}

/// 物料申请关联的采购订单 (草稿 + 已提交)
pub async fn list_linked_purchase_orders(
    pool: &PgPool,
    material_request: &str,
) -> Result<Vec<LinkedOrderHeader>, sqlx::Error> {
    sqlx::query_as::<_, LinkedOrderHeader>(
        r#"
        SELECT name, status, docstatus, COALESCE(total, 0) AS total
        FROM "tabPurchase Order"
        WHERE material_request = $1
          AND docstatus IN (0, 1)
        ORDER BY name
        "#,
    )
    .bind(material_request)
    .fetch_all(pool)
    .await
}

/// 物料申请关联的已提交采购订单编号
pub async fn list_submitted_purchase_order_names(
    pool: &PgPool,
    material_request: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT name
        FROM "tabPurchase Order"
        WHERE material_request = $1
          AND docstatus = 1
        ORDER BY name
        "#,
    )
    .bind(material_request)
    .fetch_all(pool)
    .await
}

/// 某物料最近的已提交交易 (按日期倒序)
pub async fn list_recent_transactions(
    pool: &PgPool,
    side: TradeSide,
    item_code: &str,
    limit: i64,
) -> Result<Vec<TransactionRecord>, sqlx::Error> {
    let sql = match side {
        TradeSide::Purchase => {
            r#"
            SELECT p.name AS order_name, p.supplier AS party, p.supplier_name AS party_name,
                   p.currency, p.transaction_date,
                   COALESCE(pc.qty, 0) AS qty,
                   COALESCE(pc.rate, 0) AS rate,
                   COALESCE(pc.amount, 0) AS amount
            FROM "tabPurchase Order" p
            INNER JOIN "tabPurchase Order Item" pc ON pc.parent = p.name
            WHERE p.docstatus = 1
              AND pc.item_code = $1
            ORDER BY p.transaction_date DESC, p.name DESC
            LIMIT $2
            "#
        }
        TradeSide::Sales => {
            r#"
            SELECT s.name AS order_name, s.customer AS party, s.customer_name AS party_name,
                   s.currency, s.transaction_date,
                   COALESCE(si.qty, 0) AS qty,
                   COALESCE(si.rate, 0) AS rate,
                   COALESCE(si.amount, 0) AS amount
            FROM "tabSales Order" s
            INNER JOIN "tabSales Order Item" si ON si.parent = s.name
            WHERE s.docstatus = 1
              AND si.item_code = $1
            ORDER BY s.transaction_date DESC, s.name DESC
            LIMIT $2
            "#
        }
    };
    sqlx::query_as::<_, TransactionRecord>(sql)
        .bind(item_code)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// 查询供应商
pub async fn get_supplier(
    pool: &PgPool,
    supplier: &str,
) -> Result<Option<SupplierRecord>, sqlx::Error> {
    sqlx::query_as::<_, SupplierRecord>(
        r#"
        SELECT name, supplier_name
        FROM "tabSupplier"
        WHERE name = $1
        "#,
    )
    .bind(supplier)
    .fetch_optional(pool)
    .await
}

/// 物料所属物料组是否豁免超量收货检查
pub async fn is_item_group_exempt(pool: &PgPool, item_code: &str) -> Result<bool, sqlx::Error> {
    let flag = sqlx::query_scalar::<_, i16>(
        r#"
        SELECT COALESCE(ig.custom_exempt_from_over_delivery, 0)::smallint
        FROM "tabItem" i
        INNER JOIN "tabItem Group" ig ON ig.name = i.item_group
        WHERE i.name = $1
        "#,
    )
    .bind(item_code)
    .fetch_optional(pool)
    .await?;

    Ok(flag.unwrap_or(0) != 0)
}

/// 更新草稿采购订单的供应商; 条件中带 docstatus = 0, 返回影响行数
pub async fn update_order_supplier(
    pool: &PgPool,
    purchase_order: &str,
    supplier: &str,
    supplier_name: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE "tabPurchase Order"
        SET supplier = $1,
            supplier_name = COALESCE($2, $1),
            modified = now()
        WHERE name = $3
          AND docstatus = 0
        "#,
    )
    .bind(supplier)
    .bind(supplier_name)
    .bind(purchase_order)
    .execute(pool)
    .await?;

    tracing::info!(
        "更新采购订单 {} 供应商为 {}, 影响 {} 行",
        purchase_order, supplier, result.rows_affected()
    );
    Ok(result.rows_affected())
}
