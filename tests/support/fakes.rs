use face_relations::fetch::HttpFetch;
use face_relations::polling::Sleeper;
use face_relations::QueryError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct Script {
    answers: RefCell<VecDeque<Result<String, QueryError>>>,
    requests: RefCell<Vec<String>>,
}

/// Fetcher that replays scripted answers and records requested URLs.
///
/// Clones share the same script, so a test can hand one clone to the client
/// and inspect the other. Panics when asked for more answers than scripted.
#[derive(Default, Clone)]
pub struct ScriptedFetcher {
    script: Rc<Script>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, body: &str) -> Self {
        self.script
            .answers
            .borrow_mut()
            .push_back(Ok(body.to_string()));
        self
    }

    pub fn empty(self, times: usize) -> Self {
        for _ in 0..times {
            self.script.answers.borrow_mut().push_back(Ok(String::new()));
        }
        self
    }

    pub fn status(self, code: u16, status_text: &str) -> Self {
        self.script
            .answers
            .borrow_mut()
            .push_back(Err(QueryError::Status {
                url: String::new(),
                code,
                status_text: status_text.to_string(),
            }));
        self
    }

    pub fn transport_error(self, message: &str) -> Self {
        self.script
            .answers
            .borrow_mut()
            .push_back(Err(QueryError::Transport {
                url: String::new(),
                message: message.to_string(),
            }));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.script.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.requests.borrow().len()
    }

    pub fn remaining(&self) -> usize {
        self.script.answers.borrow().len()
    }
}

impl HttpFetch for ScriptedFetcher {
    fn get(&self, url: &str) -> Result<String, QueryError> {
        self.script.requests.borrow_mut().push(url.to_string());
        let answer = self
            .script
            .answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer left for {}", url));

        // Fill in the URL the way a real transport would
        answer.map_err(|e| match e {
            QueryError::Status {
                code, status_text, ..
            } => QueryError::Status {
                url: url.to_string(),
                code,
                status_text,
            },
            QueryError::Transport { message, .. } => QueryError::Transport {
                url: url.to_string(),
                message,
            },
            other => other,
        })
    }
}

/// Sleeper that records requested waits instead of blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    pub slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}
