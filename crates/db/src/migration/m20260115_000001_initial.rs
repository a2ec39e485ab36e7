//! Initial database migration.
//!
//! Creates the enums, tables, triggers, and seed rows for the document
//! store: clients, quotations, payments, invoices, BOQs, bank accounts,
//! settings singletons, and document counters.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CLIENTS
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;

        // ============================================================
        // PART 3: DOCUMENTS
        // ============================================================
        db.execute_unprepared(QUOTATIONS_SQL).await?;
        db.execute_unprepared(QUOTATION_PAYMENTS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(BOQS_SQL).await?;

        // ============================================================
        // PART 4: BANK ACCOUNTS & SETTINGS
        // ============================================================
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(APP_SETTINGS_SQL).await?;

        // ============================================================
        // PART 5: DOCUMENT COUNTERS
        // ============================================================
        db.execute_unprepared(DOCUMENT_COUNTERS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 7: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_SETTINGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Quotation lifecycle status
CREATE TYPE quotation_status AS ENUM (
    'performa',
    'partially_paid',
    'fully_paid'
);

-- BOQ lifecycle status
CREATE TYPE boq_status AS ENUM (
    'draft',
    'sent',
    'approved',
    'rejected'
);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    address TEXT,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_clients_name ON clients (name);
";

const QUOTATIONS_SQL: &str = r"
CREATE TABLE quotations (
    id UUID PRIMARY KEY,
    quotation_number TEXT NOT NULL UNIQUE,
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE RESTRICT,
    date DATE NOT NULL,
    items JSONB NOT NULL DEFAULT '[]',
    currency TEXT NOT NULL,
    subtotal NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_discount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    tax_label TEXT NOT NULL DEFAULT 'Tax',
    tax_percent NUMERIC(7, 4) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    service_tax_label TEXT NOT NULL DEFAULT 'Service Tax',
    service_tax_percent NUMERIC(7, 4) NOT NULL DEFAULT 0,
    service_tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    status quotation_status NOT NULL DEFAULT 'performa',
    paid_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    notes TEXT,
    version INTEGER NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_quotations_paid_amount CHECK (paid_amount >= 0),
    CONSTRAINT chk_quotations_paid_within_total CHECK (paid_amount <= total_amount)
);

CREATE INDEX idx_quotations_client ON quotations (client_id);
CREATE INDEX idx_quotations_status ON quotations (status);
CREATE INDEX idx_quotations_date ON quotations (date);
";

const QUOTATION_PAYMENTS_SQL: &str = r"
CREATE TABLE quotation_payments (
    id UUID PRIMARY KEY,
    quotation_id UUID NOT NULL REFERENCES quotations(id) ON DELETE CASCADE,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    payment_method TEXT NOT NULL,
    payment_date DATE NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_quotation_payments_quotation ON quotation_payments (quotation_id);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    invoice_number TEXT NOT NULL UNIQUE,
    quotation_id UUID REFERENCES quotations(id) ON DELETE SET NULL,
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE RESTRICT,
    date DATE NOT NULL,
    items JSONB NOT NULL DEFAULT '[]',
    currency TEXT NOT NULL,
    subtotal NUMERIC(14, 2) NOT NULL DEFAULT 0,
    tax_label TEXT NOT NULL DEFAULT 'Tax',
    tax_percent NUMERIC(7, 4) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    service_tax_label TEXT NOT NULL DEFAULT 'Service Tax',
    service_tax_percent NUMERIC(7, 4) NOT NULL DEFAULT 0,
    service_tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    paid_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    payment_method TEXT NOT NULL,
    payment_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_invoices_fully_paid CHECK (paid_amount = total_amount)
);

CREATE INDEX idx_invoices_client ON invoices (client_id);
CREATE INDEX idx_invoices_quotation ON invoices (quotation_id);
CREATE INDEX idx_invoices_date ON invoices (date);
";

const BOQS_SQL: &str = r"
CREATE TABLE boqs (
    id UUID PRIMARY KEY,
    boq_number TEXT NOT NULL UNIQUE,
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE RESTRICT,
    date DATE NOT NULL,
    items JSONB NOT NULL DEFAULT '[]',
    currency TEXT NOT NULL,
    subtotal NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_discount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    tax_label TEXT NOT NULL DEFAULT 'Tax',
    tax_percent NUMERIC(7, 4) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    service_tax_label TEXT NOT NULL DEFAULT 'Service Tax',
    service_tax_percent NUMERIC(7, 4) NOT NULL DEFAULT 0,
    service_tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    status boq_status NOT NULL DEFAULT 'draft',
    notes TEXT,
    version INTEGER NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_boqs_client ON boqs (client_id);
CREATE INDEX idx_boqs_status ON boqs (status);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    account_name TEXT NOT NULL,
    bank_name TEXT NOT NULL,
    account_number TEXT NOT NULL,
    ifsc_code TEXT,
    branch TEXT,
    is_default BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const APP_SETTINGS_SQL: &str = r"
CREATE TABLE app_settings (
    key TEXT PRIMARY KEY,
    value JSONB NOT NULL DEFAULT '{}',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const DOCUMENT_COUNTERS_SQL: &str = r"
CREATE TABLE document_counters (
    doc_class TEXT NOT NULL,
    year INTEGER NOT NULL,
    last_value BIGINT NOT NULL DEFAULT 0,

    PRIMARY KEY (doc_class, year)
);
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on every update
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_clients_updated_at
    BEFORE UPDATE ON clients
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_quotations_updated_at
    BEFORE UPDATE ON quotations
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_boqs_updated_at
    BEFORE UPDATE ON boqs
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_bank_accounts_updated_at
    BEFORE UPDATE ON bank_accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_app_settings_updated_at
    BEFORE UPDATE ON app_settings
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_SETTINGS_SQL: &str = r#"
INSERT INTO app_settings (key, value) VALUES
    ('organization', '{}'),
    ('tax', '{"tax_label": "GST", "tax_percent": "0", "service_tax_enabled": false}'),
    ('general', '{"currency": "INR", "quotation_prefix": "QT", "invoice_prefix": "INV", "boq_prefix": "BOQ"}')
ON CONFLICT (key) DO NOTHING;
"#;

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS document_counters;
DROP TABLE IF EXISTS app_settings;
DROP TABLE IF EXISTS bank_accounts;
DROP TABLE IF EXISTS quotation_payments;
DROP TABLE IF EXISTS invoices;
DROP TABLE IF EXISTS boqs;
DROP TABLE IF EXISTS quotations;
DROP TABLE IF EXISTS clients;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TYPE IF EXISTS quotation_status;
DROP TYPE IF EXISTS boq_status;
";
