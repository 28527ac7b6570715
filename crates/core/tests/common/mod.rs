#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use blacknote_core::{Notify, SaveChoice, SessionHost};

/// Scripted stand-in for the GUI dialogs. Unscripted prompts answer Cancel.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub save_answers: VecDeque<SaveChoice>,
    pub open_paths: VecDeque<PathBuf>,
    pub save_paths: VecDeque<Option<PathBuf>>,
    pub prompts: Vec<String>,
    pub suggested: Vec<PathBuf>,
    pub errors: Vec<(String, String)>,
    pub infos: Vec<(String, String)>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, choice: SaveChoice) -> Self {
        self.save_answers.push_back(choice);
        self
    }

    pub fn save_to(mut self, path: Option<PathBuf>) -> Self {
        self.save_paths.push_back(path);
        self
    }

    pub fn open(mut self, path: PathBuf) -> Self {
        self.open_paths.push_back(path);
        self
    }
}

impl Notify for ScriptedHost {
    fn report_error(&mut self, title: &str, message: &str) {
        self.errors.push((title.to_string(), message.to_string()));
    }

    fn report_info(&mut self, title: &str, message: &str) {
        self.infos.push((title.to_string(), message.to_string()));
    }
}

impl SessionHost for ScriptedHost {
    fn ask_save_changes(&mut self, document_name: &str) -> SaveChoice {
        self.prompts.push(document_name.to_string());
        self.save_answers.pop_front().unwrap_or(SaveChoice::Cancel)
    }

    fn choose_open_path(&mut self) -> Option<PathBuf> {
        self.open_paths.pop_front()
    }

    fn choose_save_path(&mut self, suggested: &Path) -> Option<PathBuf> {
        self.suggested.push(suggested.to_path_buf());
        self.save_paths.pop_front().flatten()
    }
}
