use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Existing stock rows start as unsold
        manager
            .alter_table(
                Table::alter()
                    .table(Alias::new("stock_items"))
                    .add_column(
                        ColumnDef::new(Alias::new("sold"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Alias::new("stock_items"))
                    .drop_column(Alias::new("sold"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
