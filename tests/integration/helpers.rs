use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;

use cottonflow::config::Config;
use cottonflow::fs::DataDir;
use cottonflow::identity::UserDirectory;
use cottonflow::models::{Actor, ContractId, VendorId};
use cottonflow::store::FileStore;
use cottonflow::workflow::{
    ContractForm, CtsForm, PaymentForm, QualityReportForm, SamplingForm, VendorForm, Workflow,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A data directory inside a temp dir, initialized like `cottonflow init`.
pub struct TestEnv {
    pub temp: TempDir,
    pub data_dir: DataDir,
    pub users: UserDirectory,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let data_dir = DataDir::new(temp.path().join(".cottonflow"));
        data_dir.initialize().unwrap();
        Config::default().save(&data_dir.config_path()).unwrap();
        let config = Config::load(&data_dir.config_path()).unwrap();
        Self {
            temp,
            data_dir,
            users: UserDirectory::new(config.users),
        }
    }

    pub fn workflow(&self) -> Workflow<FileStore> {
        let config = Config::load(&self.data_dir.config_path()).unwrap();
        Workflow::new(FileStore::open(self.data_dir.clone()).unwrap(), config.workflow)
    }

    pub fn manager(&self) -> Actor {
        self.users.resolve("manager").unwrap()
    }

    pub fn chairman(&self) -> Actor {
        self.users.resolve("chairman").unwrap()
    }
}

pub fn register_vendor(wf: &Workflow<FileStore>) -> VendorId {
    wf.register_vendor(VendorForm {
        name: Some("Saurashtra Ginners".into()),
        gst_number: Some("24AAACS1234K1Z2".into()),
        state: Some("Gujarat".into()),
        ..VendorForm::default()
    })
    .unwrap()
    .id
}

pub fn create_contract(env: &TestEnv, wf: &Workflow<FileStore>, vendor: VendorId) -> ContractId {
    wf.create_contract(
        env.manager(),
        ContractForm {
            vendor_id: Some(vendor),
            cotton_type: Some("Shankar-6".into()),
            quantity: Some(250.0),
            price: Some(57200.0),
            entry_date: Some(date(2025, 10, 2)),
            ..ContractForm::default()
        },
    )
    .unwrap()
    .contract_id
}

pub fn report() -> QualityReportForm {
    serde_json::from_str(
        r#"{"variety": "Shankar-6", "price": 57200, "report_date": "2025-10-06",
            "uhml": 29.2, "ui": 81.8, "strength": 30.1, "elongation": 5.5,
            "mic": 4.4, "rd": 77.0, "plus_b": 8.3}"#,
    )
    .unwrap()
}

pub fn sampling(start: u32, count: u32) -> SamplingForm {
    SamplingForm {
        sequence_start: Some(start),
        sample_count: Some(count),
        arrival_date: Some(date(2025, 10, 18)),
        lot_number: None,
    }
}

pub fn cts(samples: &[u32]) -> CtsForm {
    let samples: Vec<String> = samples.iter().map(|n| format!("\"{n}\": 2.3")).collect();
    serde_json::from_str(&format!(
        r#"{{"mic_value": 4.3, "strength": 29.9, "uhml": 29.0, "ui_percent": 81.2,
            "elongation": 5.4, "rd": 76.5, "plus_b": 8.2, "trash_percent": 2.4,
            "test_date": "2025-10-24", "trash_percent_samples": {{{}}}}}"#,
        samples.join(", ")
    ))
    .unwrap()
}

pub fn payment(invoice: i64) -> PaymentForm {
    PaymentForm {
        invoice_value: Some(Decimal::from(invoice)),
        bank_name: Some("Bank of Baroda".into()),
        branch: Some("Gondal".into()),
        account_no: Some("3344556677".into()),
        ifsc_code: Some("BARB0GONDAL".into()),
        ..PaymentForm::default()
    }
}
