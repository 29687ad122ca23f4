use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_purchase_orders_table::Migration),
            Box::new(m20250101_000002_create_purchase_order_filter_indexes::Migration),
            Box::new(m20250101_000003_add_purchase_order_search_columns::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_purchase_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderNumber)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::SupplierName)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalAmount)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Currency)
                                .string_len(3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ExpectedDeliveryDate)
                                .date()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseOrders {
        Table,
        Id,
        OrderNumber,
        SupplierName,
        Status,
        TotalAmount,
        Currency,
        CreatedAt,
        ExpectedDeliveryDate,
    }
}

mod m20250101_000002_create_purchase_order_filter_indexes {

    use super::m20250101_000001_create_purchase_orders_table::PurchaseOrders;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_purchase_order_filter_indexes"
        }
    }

    const INDEXES: [(&str, PurchaseOrders); 3] = [
        ("idx_purchase_orders_status", PurchaseOrders::Status),
        ("idx_purchase_orders_currency", PurchaseOrders::Currency),
        ("idx_purchase_orders_created_at", PurchaseOrders::CreatedAt),
    ];

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (name, column) in INDEXES {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(name)
                            .table(PurchaseOrders::Table)
                            .col(column)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (name, _) in INDEXES {
                manager
                    .drop_index(
                        Index::drop()
                            .name(name)
                            .table(PurchaseOrders::Table)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }
    }
}

mod m20250101_000003_add_purchase_order_search_columns {

    use crate::entities::purchase_order::search_key;
    use sea_orm_migration::prelude::*;
    use sea_orm_migration::sea_orm::ConnectionTrait;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_add_purchase_order_search_columns"
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Id,
        OrderNumber,
        SupplierName,
        OrderNumberFolded,
        SupplierNameFolded,
    }

    const COLUMNS: [PurchaseOrders; 2] = [
        PurchaseOrders::OrderNumberFolded,
        PurchaseOrders::SupplierNameFolded,
    ];

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // SQLite alters one column per statement.
            for column in COLUMNS {
                manager
                    .alter_table(
                        Table::alter()
                            .table(PurchaseOrders::Table)
                            .add_column(ColumnDef::new(column).string().not_null().default(""))
                            .to_owned(),
                    )
                    .await?;
            }

            let db = manager.get_connection();
            let backend = manager.get_database_backend();
            let rows = db
                .query_all(
                    backend.build(
                        &Query::select()
                            .columns([
                                PurchaseOrders::Id,
                                PurchaseOrders::OrderNumber,
                                PurchaseOrders::SupplierName,
                            ])
                            .from(PurchaseOrders::Table)
                            .to_owned(),
                    ),
                )
                .await?;

            for row in rows {
                let id: i64 = row.try_get("", "id")?;
                let order_number: String = row.try_get("", "order_number")?;
                let supplier_name: String = row.try_get("", "supplier_name")?;
                db.execute(
                    backend.build(
                        &Query::update()
                            .table(PurchaseOrders::Table)
                            .values([
                                (
                                    PurchaseOrders::OrderNumberFolded,
                                    search_key(&order_number).into(),
                                ),
                                (
                                    PurchaseOrders::SupplierNameFolded,
                                    search_key(&supplier_name).into(),
                                ),
                            ])
                            .and_where(Expr::col(PurchaseOrders::Id).eq(id))
                            .to_owned(),
                    ),
                )
                .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for column in COLUMNS {
                manager
                    .alter_table(
                        Table::alter()
                            .table(PurchaseOrders::Table)
                            .drop_column(column)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }
    }
}
