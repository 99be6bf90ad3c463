use serde::{Deserialize, Serialize};

/// One medical record as stored on the ledger. `doctor` is assigned by the
/// contract (the submitting account), never by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub patient_name: String,
    pub doctor: String,
    pub medical_data: String,
}

/// Point-in-time copy of the ledger's records, in ledger index order.
///
/// The first entry is ledger index 1. A snapshot holds no reference back to
/// the ledger and is replaced wholesale by the next read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSnapshot {
    records: Vec<Record>,
}

impl RecordSnapshot {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at ledger `index` (1-based).
    pub fn get(&self, index: u64) -> Option<&Record> {
        let position = usize::try_from(index.checked_sub(1)?).ok()?;
        self.records.get(position)
    }

    pub fn latest(&self) -> Option<(u64, &Record)> {
        self.indexed().next_back()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterates `(ledger index, record)` pairs.
    pub fn indexed(&self) -> impl DoubleEndedIterator<Item = (u64, &Record)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(position, record)| (position as u64 + 1, record))
    }
}

/// Form state for a record that has not been submitted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub patient_name: String,
    pub medical_data: String,
}

impl RecordDraft {
    pub fn new(patient_name: impl Into<String>, medical_data: impl Into<String>) -> Self {
        Self {
            patient_name: patient_name.into(),
            medical_data: medical_data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> Record {
        Record {
            patient_name: name.to_string(),
            doctor: "0x01".to_string(),
            medical_data: "checkup".to_string(),
        }
    }

    #[test]
    fn snapshot_indexes_from_one() {
        let snapshot = RecordSnapshot::new(vec![record("Alice"), record("Bob")]);

        assert_eq!(snapshot.get(0), None);
        assert_eq!(snapshot.get(1).map(|r| r.patient_name.as_str()), Some("Alice"));
        assert_eq!(snapshot.get(3), None);

        let (index, latest) = snapshot.latest().unwrap();
        assert_eq!(index, 2);
        assert_eq!(latest.patient_name, "Bob");
    }

    #[test]
    fn record_uses_contract_field_names() {
        let json = serde_json::json!({
            "patientName": "Alice",
            "doctor": "0x01",
            "medicalData": "flu, 2024"
        });
        let decoded: Record = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.medical_data, "flu, 2024");
    }
}
