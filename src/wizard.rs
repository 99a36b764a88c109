//! Study wizard state machine: mode -> subject -> chapter -> response view.
//!
//! The wizard is a value. Every action consumes it and returns the next one,
//! and the selection context is rebuilt rather than patched. Network calls
//! stay outside: actions that need the backend hand back a pending request,
//! and the caller feeds the outcome back in.

use crate::content::initial_request;
use crate::domain::{Chapter, Message, Mode, Subject};
use crate::markdown::render_page;
use crate::protocol::{ChatIn, GenerateIn};

pub const CONTENT_ERROR: &str = "Error loading content. Please try again.";
pub const CHAT_ERROR: &str = "Sorry, there was an error processing your message. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
  ModeSelect,
  SubjectSelect,
  ChapterSelect,
  ResponseView,
}

/// Sub-mode of the response view; switching never refetches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Display {
  #[default]
  Content,
  Chat,
}

/// What the student has picked so far. Immutable; transitions build a new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionContext {
  pub mode: Option<Mode>,
  pub subject: Option<Subject>,
  pub chapter: Option<Chapter>,
}

impl SessionContext {
  /// A fresh mode discards any deeper selection.
  pub fn with_mode(&self, mode: Mode) -> Self {
    Self { mode: Some(mode), subject: None, chapter: None }
  }

  pub fn with_subject(&self, subject: Subject) -> Self {
    Self { mode: self.mode, subject: Some(subject), chapter: None }
  }

  pub fn with_chapter(&self, chapter: Chapter) -> Self {
    Self { mode: self.mode, subject: self.subject.clone(), chapter: Some(chapter) }
  }

  pub fn generation_key(&self) -> Option<GenerationKey> {
    Some(GenerationKey {
      mode: self.mode?,
      subject_id: self.subject.as_ref()?.id.clone(),
      chapter_id: self.chapter.as_ref()?.id.clone(),
    })
  }
}

/// Identity of one initial generation. A new key means a new request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationKey {
  pub mode: Mode,
  pub subject_id: String,
  pub chapter_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContentState {
  Idle,
  Loading,
  Ready(String),
  Failed(String),
}

/// Generation the caller must perform; hand the result to `finish_generation`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGeneration {
  pub key: GenerationKey,
  pub body: GenerateIn,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wizard {
  screen: Screen,
  context: SessionContext,
  display: Display,
  content: ContentState,
  generated_for: Option<GenerationKey>,
  messages: Vec<Message>,
  sending: bool,
}

impl Default for Wizard {
  fn default() -> Self {
    Self {
      screen: Screen::ModeSelect,
      context: SessionContext::default(),
      display: Display::Content,
      content: ContentState::Idle,
      generated_for: None,
      messages: Vec::new(),
      sending: false,
    }
  }
}

impl Wizard {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn screen(&self) -> Screen { self.screen }
  pub fn context(&self) -> &SessionContext { &self.context }
  pub fn display(&self) -> Display { self.display }
  pub fn content(&self) -> &ContentState { &self.content }
  pub fn messages(&self) -> &[Message] { &self.messages }
  pub fn is_sending(&self) -> bool { self.sending }

  /// Loaded content as a standalone HTML page titled by chapter.
  /// `None` until content is ready.
  pub fn export_page(&self) -> Option<String> {
    let ContentState::Ready(text) = &self.content else { return None };
    let title = self.context.chapter.as_ref().map(|c| c.name.as_str()).unwrap_or("Study notes");
    Some(render_page(title, text))
  }

  fn allowed(&self, screen: Screen) -> bool {
    match screen {
      Screen::ModeSelect => true,
      Screen::SubjectSelect => self.context.mode.is_some(),
      Screen::ChapterSelect => self.context.subject.is_some(),
      Screen::ResponseView => self.context.chapter.is_some(),
    }
  }

  /// Move to `screen` if its guard holds, otherwise back to mode selection.
  /// Selections are kept either way.
  pub fn navigate(self, screen: Screen) -> Self {
    let screen = if self.allowed(screen) { screen } else { Screen::ModeSelect };
    Self { screen, ..self }
  }

  /// One step back along the breadcrumb.
  pub fn back(self) -> Self {
    let target = match self.screen {
      Screen::ModeSelect | Screen::SubjectSelect => Screen::ModeSelect,
      Screen::ChapterSelect => Screen::SubjectSelect,
      Screen::ResponseView => Screen::ChapterSelect,
    };
    self.navigate(target)
  }

  pub fn choose_mode(self, mode: Mode) -> Self {
    let context = self.context.with_mode(mode);
    Self { context, ..self }.navigate(Screen::SubjectSelect)
  }

  pub fn choose_subject(self, subject: Subject) -> Self {
    let context = self.context.with_subject(subject);
    Self { context, ..self }.navigate(Screen::ChapterSelect)
  }

  pub fn choose_chapter(self, chapter: Chapter) -> Self {
    let context = self.context.with_chapter(chapter);
    Self { context, display: Display::Content, ..self }.navigate(Screen::ResponseView)
  }

  /// Drop everything and start over.
  pub fn new_session(self) -> Self {
    Self::default()
  }

  pub fn toggle_display(self) -> Self {
    let display = match self.display {
      Display::Content => Display::Chat,
      Display::Chat => Display::Content,
    };
    Self { display, ..self }
  }

  pub fn show_chat(self) -> Self {
    Self { display: Display::Chat, ..self }
  }

  /// True when the response view has not yet requested content for the current selection.
  pub fn needs_generation(&self) -> bool {
    self.screen == Screen::ResponseView && self.context.generation_key().is_some_and(|k| self.generated_for.as_ref() != Some(&k))
  }

  fn generation_body(&self) -> Option<(GenerationKey, GenerateIn)> {
    let key = self.context.generation_key()?;
    let subject = self.context.subject.as_ref()?;
    let chapter = self.context.chapter.as_ref()?;
    let body = GenerateIn {
      mode: Some(key.mode.as_str().to_string()),
      subject: Some(subject.name.clone()),
      chapter: Some(chapter.name.clone()),
      request: Some(initial_request(key.mode, &subject.name, &chapter.name)),
    };
    Some((key, body))
  }

  fn chat_body(&self, text: &str) -> Option<ChatIn> {
    let subject = self.context.subject.as_ref()?;
    let chapter = self.context.chapter.as_ref()?;
    Some(ChatIn {
      mode: Some(self.context.mode?.as_str().to_string()),
      subject: Some(subject.name.clone()),
      chapter: Some(chapter.name.clone()),
      message: Some(text.to_string()),
      history: Some(self.messages.iter().filter_map(|m| serde_json::to_value(m).ok()).collect()),
    })
  }

  /// Claim the single generation for the current (mode, subject, chapter).
  /// Returns `None` if it was already requested or the view isn't active.
  pub fn start_generation(self) -> (Self, Option<PendingGeneration>) {
    if !self.needs_generation() {
      return (self, None);
    }
    let Some((key, body)) = self.generation_body() else {
      return (self, None);
    };
    let next = Self {
      generated_for: Some(key.clone()),
      content: ContentState::Loading,
      messages: Vec::new(),
      sending: false,
      ..self
    };
    (next, Some(PendingGeneration { key, body }))
  }

  /// Apply a generation outcome. Results for a selection the student has since
  /// left are dropped.
  pub fn finish_generation<E>(self, key: &GenerationKey, result: Result<String, E>) -> Self {
    if self.generated_for.as_ref() != Some(key) {
      return self;
    }
    match result {
      Ok(content) => Self {
        messages: vec![Message::assistant(content.clone())],
        content: ContentState::Ready(content),
        ..self
      },
      Err(_) => Self { content: ContentState::Failed(CONTENT_ERROR.into()), ..self },
    }
  }

  /// Append the student's message and return the chat request to send.
  /// Refused while a send is in flight or when the text is blank.
  pub fn begin_send(self, text: &str) -> (Self, Option<ChatIn>) {
    if self.sending || text.trim().is_empty() || self.screen != Screen::ResponseView {
      return (self, None);
    }
    let Some(request) = self.chat_body(text) else {
      return (self, None);
    };
    let mut messages = self.messages;
    messages.push(Message::user(text));
    (Self { messages, sending: true, ..self }, Some(request))
  }

  pub fn finish_send<E>(self, result: Result<String, E>) -> Self {
    if !self.sending {
      return self;
    }
    let reply = match result {
      Ok(content) => Message::assistant(content),
      Err(_) => Message::assistant_error(CHAT_ERROR),
    };
    let mut messages = self.messages;
    messages.push(reply);
    Self { messages, sending: false, ..self }
  }
}
