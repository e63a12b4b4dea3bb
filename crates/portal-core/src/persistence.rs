use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::chat::ChatRole;
use super::chat::MessageContent;
use super::chat::MessageLog;
use super::error::PortalError;
use super::progress::ApplicationProgress;
use super::workflow::application_template;
use super::workflow::ApplicationTemplateId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEvent {
    SessionStarted {
        renewal: bool,
        tier: String,
        template_id: String,
    },
    MessageAppended {
        message_seq: u64,
        role: ChatRole,
        content: MessageContent,
    },
    StepAdvanced {
        step_index: usize,
        title: String,
    },
    ApplicationSubmitted,
    DocumentsSelected {
        batch_id: u64,
        document_ids: Vec<u64>,
        filenames: Vec<String>,
    },
    DocumentsAnalyzed {
        batch_id: u64,
        updated: usize,
    },
    DocumentRemoved {
        document_id: u64,
    },
}

impl TranscriptEvent {
    /// One-line description for event listings.
    pub fn summary(&self) -> String {
        match self {
            Self::SessionStarted { renewal, tier, .. } => {
                let mode = if *renewal { "renewal" } else { "new application" };
                format!("session started ({tier}, {mode})")
            }
            Self::MessageAppended {
                message_seq,
                role,
                content,
            } => {
                let first = content.to_lines().into_iter().next().unwrap_or_default();
                format!("{} #{message_seq}: {first}", role.label())
            }
            Self::StepAdvanced { step_index, title } => {
                format!("step {} current: {title}", step_index + 1)
            }
            Self::ApplicationSubmitted => "application submitted".to_string(),
            Self::DocumentsSelected {
                batch_id,
                filenames,
                ..
            } => format!("batch {batch_id} selected: {}", filenames.join(", ")),
            Self::DocumentsAnalyzed { batch_id, updated } => {
                format!("batch {batch_id} analyzed, {updated} documents updated")
            }
            Self::DocumentRemoved { document_id } => format!("document #{document_id} removed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub seq: u64,
    pub ts_ms: i64,
    #[serde(flatten)]
    pub event: TranscriptEvent,
}

/// Append-only JSONL journal of one chat session.
#[derive(Debug)]
pub struct TranscriptStore {
    path: PathBuf,
    next_seq: u64,
}

impl TranscriptStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PortalError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PortalError::io(&path, source))?;
        }
        let existing = load_records(path.as_path())?;
        let next_seq = existing
            .iter()
            .map(|record| record.seq)
            .max()
            .map_or(1, |seq| seq.saturating_add(1));
        Ok(Self { path, next_seq })
    }

    /// `<data dir>/portal/transcripts/<timestamp>.jsonl`.
    pub fn session_path(data_dir: &Path) -> PathBuf {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        data_dir
            .join("portal")
            .join("transcripts")
            .join(format!("{stamp}.jsonl"))
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn append(&mut self, event: TranscriptEvent) -> Result<u64, PortalError> {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        let record = TranscriptRecord {
            seq,
            ts_ms: chrono::Utc::now().timestamp_millis(),
            event,
        };
        let line = serde_json::to_string(&record)?;
        append_line(self.path.as_path(), line.as_str())
            .map_err(|source| PortalError::io(&self.path, source))?;
        Ok(seq)
    }

    pub fn load(&self) -> Result<Vec<TranscriptRecord>, PortalError> {
        load_records(self.path.as_path())
    }

    /// Records strictly after `seq_exclusive`, for tailing a journal.
    pub fn load_since(&self, seq_exclusive: u64) -> Result<Vec<TranscriptRecord>, PortalError> {
        let records = self.load()?;
        Ok(records
            .into_iter()
            .filter(|record| record.seq > seq_exclusive)
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedDocument {
    pub id: u64,
    pub batch_id: u64,
    pub filename: String,
    pub analyzed: bool,
}

/// Session view rebuilt from journal records.
#[derive(Debug, Clone)]
pub struct ReplayedSession {
    pub renewal: bool,
    pub tier: String,
    pub messages: MessageLog,
    pub progress: ApplicationProgress,
    pub documents: Vec<ReplayedDocument>,
    pub submitted: bool,
}

impl ReplayedSession {
    fn started(renewal: bool, tier: String) -> Self {
        let template = application_template(ApplicationTemplateId::for_renewal(renewal));
        Self {
            renewal,
            tier,
            messages: MessageLog::new(),
            progress: ApplicationProgress::from_template(template),
            documents: Vec::new(),
            submitted: false,
        }
    }
}

/// Replays records in `seq` order. Each `SessionStarted` begins a fresh
/// session; the last one wins. Returns `None` when no session was started.
pub fn replay_transcript(records: &[TranscriptRecord]) -> Option<ReplayedSession> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|record| record.seq);

    let mut latest: Option<ReplayedSession> = None;
    for record in sorted {
        match record.event {
            TranscriptEvent::SessionStarted { renewal, tier, .. } => {
                latest = Some(ReplayedSession::started(renewal, tier));
            }
            event => {
                if let Some(session) = latest.as_mut() {
                    apply_event(session, event);
                }
            }
        }
    }

    latest
}

fn apply_event(session: &mut ReplayedSession, event: TranscriptEvent) {
    match event {
        TranscriptEvent::SessionStarted { .. } => {}
        TranscriptEvent::MessageAppended { role, content, .. } => {
            session.messages.append(role, content);
        }
        TranscriptEvent::StepAdvanced { step_index, .. } => {
            session.progress.advance(step_index);
        }
        TranscriptEvent::ApplicationSubmitted => {
            session.progress.finish();
            session.submitted = true;
        }
        TranscriptEvent::DocumentsSelected {
            batch_id,
            document_ids,
            filenames,
        } => {
            session.documents.extend(document_ids.into_iter().zip(filenames).map(
                |(id, filename)| ReplayedDocument {
                    id,
                    batch_id,
                    filename,
                    analyzed: false,
                },
            ));
        }
        TranscriptEvent::DocumentsAnalyzed { batch_id, .. } => {
            for document in session
                .documents
                .iter_mut()
                .filter(|document| document.batch_id == batch_id)
            {
                document.analyzed = true;
            }
        }
        TranscriptEvent::DocumentRemoved { document_id } => {
            session.documents.retain(|document| document.id != document_id);
        }
    }
}

fn load_records(path: &Path) -> Result<Vec<TranscriptRecord>, PortalError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path).map_err(|source| PortalError::io(path, source))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| PortalError::io(path, source))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TranscriptRecord>(&line) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(path = %path.display(), %err, "skipping unreadable transcript line"),
        }
    }
    Ok(records)
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::replay_transcript;
    use super::TranscriptEvent;
    use super::TranscriptRecord;
    use super::TranscriptStore;
    use crate::chat::ChatRole;
    use crate::chat::MessageContent;
    use pretty_assertions::assert_eq;

    fn record(seq: u64, event: TranscriptEvent) -> TranscriptRecord {
        TranscriptRecord {
            seq,
            ts_ms: 0,
            event,
        }
    }

    fn started() -> TranscriptEvent {
        TranscriptEvent::SessionStarted {
            renewal: false,
            tier: "Elite Plus".to_string(),
            template_id: "esg_certificate".to_string(),
        }
    }

    fn message(seq: u64, role: ChatRole, text: &str) -> TranscriptEvent {
        TranscriptEvent::MessageAppended {
            message_seq: seq,
            role,
            content: MessageContent::text(text),
        }
    }

    #[test]
    fn append_records_are_monotonic() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("session.jsonl");
        let mut store = TranscriptStore::open(&path).expect("open");
        let seq1 = store.append(started()).expect("append");
        let seq2 = store
            .append(message(1, ChatRole::Assistant, "hi"))
            .expect("append");
        assert_eq!((seq1, seq2), (1, 2));

        let reopened = TranscriptStore::open(&path).expect("reopen");
        let loaded = reopened.load().expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(reopened.load_since(1).expect("tail").len(), 1);
    }

    #[test]
    fn tail_lists_only_records_after_the_cursor() {
        let dir = tempdir().expect("tmpdir");
        let mut store = TranscriptStore::open(dir.path().join("session.jsonl")).expect("open");
        store.append(started()).expect("append");
        store
            .append(message(1, ChatRole::Assistant, "Welcome back\nsecond line"))
            .expect("append");
        store
            .append(TranscriptEvent::StepAdvanced {
                step_index: 2,
                title: "Documents".to_string(),
            })
            .expect("append");
        store.append(TranscriptEvent::DocumentRemoved { document_id: 4 }).expect("append");

        let tail: Vec<(u64, String)> = store
            .load_since(2)
            .expect("tail")
            .into_iter()
            .map(|record| (record.seq, record.event.summary()))
            .collect();
        assert_eq!(
            tail,
            vec![
                (3, "step 3 current: Documents".to_string()),
                (4, "document #4 removed".to_string()),
            ]
        );
        assert!(store.load_since(4).expect("tail").is_empty());
        assert_eq!(
            store.load_since(1).expect("tail")[0].event.summary(),
            "assistant #1: Welcome back"
        );
        assert_eq!(started().summary(), "session started (Elite Plus, new application)");
    }

    #[test]
    fn reopening_continues_the_sequence() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("nested").join("session.jsonl");
        let mut store = TranscriptStore::open(&path).expect("open");
        store.append(started()).expect("append");
        drop(store);

        let mut store = TranscriptStore::open(&path).expect("reopen");
        let seq = store.append(TranscriptEvent::ApplicationSubmitted).expect("append");
        assert_eq!(seq, 2);
    }

    #[test]
    fn corrupt_lines_are_skipped() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("session.jsonl");
        let mut store = TranscriptStore::open(&path).expect("open");
        store.append(started()).expect("append");
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut file| std::io::Write::write_all(&mut file, b"{not json\n"))
            .expect("corrupt");
        assert_eq!(store.load().expect("load").len(), 1);
    }

    #[test]
    fn replay_rebuilds_messages_and_progress() {
        let records = vec![
            record(1, started()),
            record(2, message(1, ChatRole::Assistant, "greeting")),
            record(4, message(3, ChatRole::Assistant, "ack")),
            record(3, message(2, ChatRole::User, "prefill")),
            record(
                5,
                TranscriptEvent::StepAdvanced {
                    step_index: 2,
                    title: "Documents".to_string(),
                },
            ),
        ];
        let session = replay_transcript(&records).expect("replay");
        let texts: Vec<&str> = session
            .messages
            .iter()
            .filter_map(|message| message.content.as_text())
            .collect();
        assert_eq!(texts, vec!["greeting", "prefill", "ack"]);
        assert_eq!(session.progress.current_index(), Some(2));
    }

    #[test]
    fn replay_tracks_document_lifecycle() {
        let records = vec![
            record(1, started()),
            record(
                2,
                TranscriptEvent::DocumentsSelected {
                    batch_id: 1,
                    document_ids: vec![1, 2, 3],
                    filenames: vec!["a".into(), "b".into(), "c".into()],
                },
            ),
            record(3, TranscriptEvent::DocumentRemoved { document_id: 2 }),
            record(4, TranscriptEvent::DocumentsAnalyzed { batch_id: 1, updated: 2 }),
        ];
        let session = replay_transcript(&records).expect("replay");
        let ids: Vec<u64> = session.documents.iter().map(|doc| doc.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(session.documents.iter().all(|doc| doc.analyzed));
    }

    #[test]
    fn events_before_any_session_are_ignored() {
        let records = vec![record(1, message(1, ChatRole::User, "orphan"))];
        assert!(replay_transcript(&records).is_none());
    }

    #[test]
    fn later_session_start_replaces_earlier_state() {
        let records = vec![
            record(1, started()),
            record(2, message(1, ChatRole::User, "old")),
            record(3, started()),
        ];
        let session = replay_transcript(&records).expect("replay");
        assert!(session.messages.is_empty());
    }
}
