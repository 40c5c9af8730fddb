use crate::models::{ChainRoot, Hop, LinkedDocumentRow, ProductionPlan, ProductionPlanItem};
use sqlx::PgPool;

/// 查询链路某一环节的明细行 (排除已取消单据)
///
/// 表名与关联列来自固定枚举, 根单据编号始终作为绑定参数传入。
pub async fn query_chain_rows(
    pool: &PgPool,
    root: &ChainRoot,
    hop: Hop,
) -> Result<Vec<LinkedDocumentRow>, sqlx::Error> {
    let (header_table, item_table) = hop.tables();
    let link_column = root.link_column(hop);
    let sql = format!(
        r#"
        SELECT d.name AS parent,
               d.status,
               d.docstatus,
               i.item_code,
               COALESCE(i.qty, 0) AS qty,
               COALESCE(i.amount, 0) AS amount
        FROM "{header_table}" d
        INNER JOIN "{item_table}" i ON i.parent = d.name
        WHERE d.{link_column} = $1
          AND d.docstatus < 2
        ORDER BY d.name, i.idx
        "#
    );

    sqlx::query_as::<_, LinkedDocumentRow>(&sql)
        .bind(&root.name)
        .fetch_all(pool)
        .await
}

/// 销售订单关联的生产计划 (最新在前)
pub async fn query_production_plans(
    pool: &PgPool,
    sales_order: &str,
) -> Result<Vec<ProductionPlan>, sqlx::Error> {
    sqlx::query_as::<_, ProductionPlan>(
        r#"
        SELECT pp.name,
               pp.status,
               pp.docstatus,
               pp.posting_date,
               COALESCE(pp.total_planned_qty, 0) AS total_planned_qty,
               COALESCE(pp.total_produced_qty, 0) AS total_produced_qty
        FROM "tabProduction Plan" pp
        WHERE pp.sales_order = $1
          AND pp.docstatus < 2
        ORDER BY pp.creation DESC
        "#,
    )
    .bind(sales_order)
    .fetch_all(pool)
    .await
}

/// 销售订单关联生产计划的明细
pub async fn query_production_plan_items(
    pool: &PgPool,
    sales_order: &str,
) -> Result<Vec<ProductionPlanItem>, sqlx::Error> {
    sqlx::query_as::<_, ProductionPlanItem>(
        r#"
        SELECT ppi.parent AS plan,
               ppi.item_code,
               COALESCE(ppi.planned_qty, 0) AS planned_qty,
               COALESCE(ppi.produced_qty, 0) AS produced_qty
        FROM "tabProduction Plan Item" ppi
        INNER JOIN "tabProduction Plan" pp ON ppi.parent = pp.name
        WHERE pp.sales_order = $1
          AND pp.docstatus < 2
        ORDER BY ppi.parent, ppi.idx
        "#,
    )
    .bind(sales_order)
    .fetch_all(pool)
    .await
}
