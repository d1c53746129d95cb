//! # Company Settings Repository
//!
//! Persistence for the single company settings row.
//!
//! ## Single-Row Pattern
//! The table is constrained to `id = 1`. `get()` returns the defaults when
//! no row has been saved yet, so callers never see "settings missing".

use billmitra_core::{BankDetails, CompanySettings};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;

/// Repository for company settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Fetches the company settings, or defaults when never saved.
    pub async fn get(&self) -> DbResult<CompanySettings> {
        let row = sqlx::query(
            r#"
            SELECT name, address1, address2, city, state, state_code, pincode,
                   gstin, mobile1, mobile2, office_phone, email,
                   bank_account_holder, bank_name, bank_account_number,
                   bank_branch, bank_ifsc_code, invoice_prefix
            FROM company_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!("No settings row yet, returning defaults");
            return Ok(CompanySettings::default());
        };

        Ok(CompanySettings {
            name: row.get("name"),
            address1: row.get("address1"),
            address2: row.get("address2"),
            city: row.get("city"),
            state: row.get("state"),
            state_code: row.get("state_code"),
            pincode: row.get("pincode"),
            gstin: row.get("gstin"),
            mobile1: row.get("mobile1"),
            mobile2: row.get("mobile2"),
            office_phone: row.get("office_phone"),
            email: row.get("email"),
            bank_details: BankDetails {
                account_holder: row.get("bank_account_holder"),
                bank_name: row.get("bank_name"),
                account_number: row.get("bank_account_number"),
                branch: row.get("bank_branch"),
                ifsc_code: row.get("bank_ifsc_code"),
            },
            invoice_prefix: row.get("invoice_prefix"),
        })
    }

    /// Saves the company settings (insert-or-replace on the single row).
    pub async fn save(&self, settings: &CompanySettings) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO company_settings
                (id, name, address1, address2, city, state, state_code, pincode,
                 gstin, mobile1, mobile2, office_phone, email,
                 bank_account_holder, bank_name, bank_account_number,
                 bank_branch, bank_ifsc_code, invoice_prefix, updated_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                    ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address1 = excluded.address1,
                address2 = excluded.address2,
                city = excluded.city,
                state = excluded.state,
                state_code = excluded.state_code,
                pincode = excluded.pincode,
                gstin = excluded.gstin,
                mobile1 = excluded.mobile1,
                mobile2 = excluded.mobile2,
                office_phone = excluded.office_phone,
                email = excluded.email,
                bank_account_holder = excluded.bank_account_holder,
                bank_name = excluded.bank_name,
                bank_account_number = excluded.bank_account_number,
                bank_branch = excluded.bank_branch,
                bank_ifsc_code = excluded.bank_ifsc_code,
                invoice_prefix = excluded.invoice_prefix,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&settings.name)
        .bind(&settings.address1)
        .bind(&settings.address2)
        .bind(&settings.city)
        .bind(&settings.state)
        .bind(&settings.state_code)
        .bind(&settings.pincode)
        .bind(&settings.gstin)
        .bind(&settings.mobile1)
        .bind(&settings.mobile2)
        .bind(&settings.office_phone)
        .bind(&settings.email)
        .bind(&settings.bank_details.account_holder)
        .bind(&settings.bank_details.bank_name)
        .bind(&settings.bank_details.account_number)
        .bind(&settings.bank_details.branch)
        .bind(&settings.bank_details.ifsc_code)
        .bind(&settings.invoice_prefix)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!("Company settings saved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
