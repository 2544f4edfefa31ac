//! Migration: Create the user table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).uuid().not_null().primary_key())
                    // Authoritative email uniqueness; the service check only improves the error
                    .col(ColumnDef::new(User::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(User::Phone).string().null())
                    .col(ColumnDef::new(User::Gender).string_len(16).null())
                    .col(ColumnDef::new(User::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(User::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(User::BirthDate).date().null())
                    .col(ColumnDef::new(User::Status).string_len(16).not_null())
                    .col(ColumnDef::new(User::Password).string().not_null())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing pages through users in creation order
        manager
            .create_index(
                Index::create()
                    .name("idx_user_created_at_id")
                    .table(User::Table)
                    .col(User::CreatedAt)
                    .col(User::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    Email,
    Phone,
    Gender,
    FirstName,
    LastName,
    BirthDate,
    Status,
    Password,
    CreatedAt,
    UpdatedAt,
}
