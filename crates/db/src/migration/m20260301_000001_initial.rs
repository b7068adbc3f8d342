//! Initial schema: churches, members and their contributions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Churches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Churches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Churches::Name).string().not_null())
                    .col(ColumnDef::new(Churches::Nif).string_len(20))
                    .col(ColumnDef::new(Churches::Address).string())
                    .col(ColumnDef::new(Churches::City).string())
                    .col(ColumnDef::new(Churches::Country).string())
                    .col(
                        ColumnDef::new(Churches::CurrencySymbol)
                            .string_len(8)
                            .not_null()
                            .default("€"),
                    )
                    .col(
                        ColumnDef::new(Churches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Members::ChurchId).uuid().not_null())
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Email).string())
                    .col(ColumnDef::new(Members::TaxId).string_len(32))
                    .col(ColumnDef::new(Members::Address).string())
                    .col(
                        ColumnDef::new(Members::Role)
                            .string_len(32)
                            .not_null()
                            .default("member"),
                    )
                    .col(
                        ColumnDef::new(Members::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_church")
                            .from(Members::Table, Members::ChurchId)
                            .to(Churches::Table, Churches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contributions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contributions::ChurchId).uuid().not_null())
                    .col(ColumnDef::new(Contributions::MemberId).uuid())
                    .col(ColumnDef::new(Contributions::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Contributions::Category)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contributions::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contributions::Description).text())
                    .col(
                        ColumnDef::new(Contributions::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contributions::ReceiptKey).string())
                    .col(
                        ColumnDef::new(Contributions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contributions_church")
                            .from(Contributions::Table, Contributions::ChurchId)
                            .to(Churches::Table, Churches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contributions_member")
                            .from(Contributions::Table, Contributions::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Declaration queries scan one church's incoming rows over a date window.
        manager
            .create_index(
                Index::create()
                    .name("idx_contributions_church_kind_date")
                    .table(Contributions::Table)
                    .col(Contributions::ChurchId)
                    .col(Contributions::Kind)
                    .col(Contributions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_members_church")
                    .table(Members::Table)
                    .col(Members::ChurchId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Churches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Churches {
    Table,
    Id,
    Name,
    Nif,
    Address,
    City,
    Country,
    CurrencySymbol,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    ChurchId,
    Name,
    Email,
    TaxId,
    Address,
    Role,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Contributions {
    Table,
    Id,
    ChurchId,
    MemberId,
    Kind,
    Category,
    AmountCents,
    Description,
    OccurredAt,
    ReceiptKey,
    CreatedAt,
}
