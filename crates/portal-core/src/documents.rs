use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Verified,
}

impl DocumentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: u64,
    pub batch_id: u64,
    pub filename: String,
    pub doc_type: Option<String>,
    pub status: DocumentStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredDocument {
    pub name: &'static str,
    pub description: &'static str,
}

pub const REQUIRED_DOCUMENTS: [RequiredDocument; 4] = [
    RequiredDocument {
        name: "ESG / Sustainability Policy",
        description: "ESG commitment document",
    },
    RequiredDocument {
        name: "Latest ESG / Sustainability Report",
        description: "Annual sustainability report",
    },
    RequiredDocument {
        name: "Governance or Ethics Policy",
        description: "Governance framework & code of conduct",
    },
    RequiredDocument {
        name: "Trade License",
        description: "Valid license for verification",
    },
];

/// No file is actually read, so every selection yields this many entries.
pub const ANALYSIS_BATCH_SIZE: usize = 3;

pub const ANALYZING_MESSAGE: &str = "Analyzing documents with AI...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentVerdict {
    pub default_filename: &'static str,
    pub doc_type: &'static str,
    pub status: DocumentStatus,
    pub message: &'static str,
}

pub const CANNED_VERDICTS: [DocumentVerdict; ANALYSIS_BATCH_SIZE] = [
    DocumentVerdict {
        default_filename: "Screenshot 2025-12-11 at 11.23.19 PM.png",
        doc_type: "Esg policy",
        status: DocumentStatus::Verified,
        message: "Document appears to be a valid ESG policy. Contains key sustainability commitments.",
    },
    DocumentVerdict {
        default_filename: "Screenshot 2025-12-11 at 11.23.30 PM.png",
        doc_type: "Sustainability report",
        status: DocumentStatus::Verified,
        message: "Sustainability report identified. Includes GRI-aligned disclosures.",
    },
    DocumentVerdict {
        default_filename: "Screenshot 2025-12-11 at 11.23.34 PM.png",
        doc_type: "Governance policy",
        status: DocumentStatus::Pending,
        message: "Document received for review.",
    },
];

/// Creates the pending entries for one simulated selection. Names come from
/// the selection where given; ids start at `first_id`.
pub fn simulate_document_analysis(
    selection: &[String],
    batch_id: u64,
    first_id: u64,
) -> Vec<UploadedDocument> {
    CANNED_VERDICTS
        .iter()
        .enumerate()
        .map(|(idx, verdict)| UploadedDocument {
            id: first_id + idx as u64,
            batch_id,
            filename: selection
                .get(idx)
                .cloned()
                .unwrap_or_else(|| verdict.default_filename.to_string()),
            doc_type: None,
            status: DocumentStatus::Pending,
            message: ANALYZING_MESSAGE.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisBatch {
    pub batch_id: u64,
    pub document_ids: [u64; ANALYSIS_BATCH_SIZE],
}

/// Uploaded documents of one session, grouped into analysis batches.
#[derive(Debug, Clone)]
pub struct DocumentTray {
    documents: Vec<UploadedDocument>,
    next_document_id: u64,
    next_batch_id: u64,
    in_flight: Vec<u64>,
}

impl Default for DocumentTray {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            next_document_id: 1,
            next_batch_id: 1,
            in_flight: Vec::new(),
        }
    }
}

impl DocumentTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_files(&mut self, selection: &[String]) -> AnalysisBatch {
        let batch_id = self.next_batch_id;
        self.next_batch_id = self.next_batch_id.saturating_add(1);
        let created = simulate_document_analysis(selection, batch_id, self.next_document_id);
        self.next_document_id = self
            .next_document_id
            .saturating_add(ANALYSIS_BATCH_SIZE as u64);

        let mut document_ids = [0; ANALYSIS_BATCH_SIZE];
        for (slot, document) in document_ids.iter_mut().zip(created.iter()) {
            *slot = document.id;
        }
        self.documents.extend(created);
        self.in_flight.push(batch_id);
        AnalysisBatch {
            batch_id,
            document_ids,
        }
    }

    /// Applies the canned verdicts to whatever is left of `batch_id`.
    /// Returns how many entries were updated.
    pub fn apply_verdicts(&mut self, batch_id: u64) -> usize {
        let Some(pos) = self.in_flight.iter().position(|id| *id == batch_id) else {
            return 0;
        };
        self.in_flight.remove(pos);

        let mut updated = 0;
        let mut slot = 0;
        for document in self
            .documents
            .iter_mut()
            .filter(|document| document.batch_id == batch_id)
        {
            // Slot follows the original position inside the batch, so a
            // removed entry does not shift the verdicts of the others.
            while slot < ANALYSIS_BATCH_SIZE
                && document.id != Self::batch_first_id(batch_id) + slot as u64
            {
                slot += 1;
            }
            let Some(verdict) = CANNED_VERDICTS.get(slot) else {
                break;
            };
            document.doc_type = Some(verdict.doc_type.to_string());
            document.status = verdict.status;
            document.message = verdict.message.to_string();
            updated += 1;
            slot += 1;
        }
        updated
    }

    fn batch_first_id(batch_id: u64) -> u64 {
        (batch_id - 1) * ANALYSIS_BATCH_SIZE as u64 + 1
    }

    pub fn remove(&mut self, document_id: u64) -> Option<UploadedDocument> {
        let pos = self
            .documents
            .iter()
            .position(|document| document.id == document_id)?;
        let removed = self.documents.remove(pos);
        Some(removed)
    }

    /// In-flight batch with no documents left, if the last removal emptied one.
    pub fn abandoned_batch(&self, batch_id: u64) -> bool {
        self.in_flight.contains(&batch_id)
            && !self
                .documents
                .iter()
                .any(|document| document.batch_id == batch_id)
    }

    pub fn forget_batch(&mut self, batch_id: u64) {
        self.in_flight.retain(|id| *id != batch_id);
    }

    pub fn is_analyzing(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedDocument> {
        self.documents.iter()
    }

    pub fn get(&self, document_id: u64) -> Option<&UploadedDocument> {
        self.documents
            .iter()
            .find(|document| document.id == document_id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn verified_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|document| document.status == DocumentStatus::Verified)
            .count()
    }
}
