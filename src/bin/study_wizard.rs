//! Terminal front end for the Revision Platform.
//!
//! Walks the student through mode -> subject -> chapter, then shows the
//! generated content and an optional chat thread. Talks to the backend at
//! REVISION_API_URL (default http://localhost:3001).

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use revision_backend::client::ApiClient;
use revision_backend::domain::{Chapter, Mode, Role, Subject};
use revision_backend::markdown::write_page;
use revision_backend::telemetry;
use revision_backend::wizard::{ContentState, Display, Screen, Wizard};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_client_tracing();

  let client = ApiClient::from_env()?;
  if let Err(e) = client.health().await {
    warn!(target: "client", error = %e, base_url = %client.base_url(), "Backend health check failed");
    println!("⚠️  Backend at {} is not responding ({}). Continuing anyway.", client.base_url(), e);
  }

  let mut input = BufReader::new(tokio::io::stdin()).lines();
  let mut wizard = Wizard::new();
  let mut subjects: Option<Vec<Subject>> = None;
  let mut chapters: Option<(String, Vec<Chapter>)> = None;
  let mut shown_messages = 0usize;

  println!("📚 AI Revision Platform");
  println!("Structure your learning journey with AI-powered assistance\n");

  loop {
    wizard = match wizard.screen() {
      Screen::ModeSelect => {
        println!("Choose Your Learning Mode");
        for (i, m) in Mode::ALL.iter().enumerate() {
          println!("  {}. {} {}", i + 1, m.emoji(), m.label());
        }
        let Some(line) = prompt(&mut input, "mode> ").await? else { break };
        match line.as_str() {
          "q" => break,
          s => match pick(s, &Mode::ALL) {
            Some(mode) => wizard.choose_mode(*mode),
            None => wizard,
          },
        }
      }

      Screen::SubjectSelect => {
        if subjects.is_none() {
          match client.list_subjects().await {
            Ok(loaded) => subjects = Some(loaded),
            Err(e) => println!("Could not load subjects: {}", e),
          }
        }
        let list = subjects.as_deref().unwrap_or_default();
        let mode = wizard.context().mode.unwrap_or(Mode::Revision);
        println!("\nHome / Select Subject   [{} {} Mode]", mode.emoji(), mode.label());
        for (i, s) in list.iter().enumerate() {
          println!("  {}. {} {} ({} chapters) - {}", i + 1, s.icon, s.name, s.chapter_count, s.description);
        }
        let Some(line) = prompt(&mut input, "subject (b=back)> ").await? else { break };
        match line.as_str() {
          "q" => break,
          "b" => wizard.back(),
          s => match pick(s, list) {
            Some(subject) => wizard.choose_subject(subject.clone()),
            None => wizard,
          },
        }
      }

      Screen::ChapterSelect => {
        let Some(subject) = wizard.context().subject.clone() else {
          wizard = wizard.navigate(Screen::ModeSelect);
          continue;
        };
        if chapters.as_ref().map(|(id, _)| id != &subject.id).unwrap_or(true) {
          match client.list_chapters(&subject.id).await {
            Ok(loaded) => chapters = Some((subject.id.clone(), loaded)),
            Err(e) => {
              chapters = None;
              println!("Could not load chapters: {}", e);
            }
          }
        }
        let list = chapters.as_ref().map(|(_, c)| c.as_slice()).unwrap_or_default();
        println!("\nHome / {} / Select Chapter", subject.name);
        for (i, c) in list.iter().enumerate() {
          println!("  {}. {} [{} · {} topics] - {}", i + 1, c.name, c.difficulty, c.topic_count, c.description);
        }
        let Some(line) = prompt(&mut input, "chapter (b=back)> ").await? else { break };
        match line.as_str() {
          "q" => break,
          "b" => wizard.back(),
          s => match pick(s, list) {
            Some(chapter) => wizard.choose_chapter(chapter.clone()),
            None => wizard,
          },
        }
      }

      Screen::ResponseView => {
        let (next, pending) = wizard.start_generation();
        wizard = next;
        if let Some(pending) = pending {
          println!("\nGenerating your personalized content...");
          let result = client.generate(&pending.body).await.map(|out| out.content);
          if let Err(e) = &result {
            warn!(target: "client", error = %e, "Generation request failed");
          }
          wizard = wizard.finish_generation(&pending.key, result);
          shown_messages = 0;
          print_header(&wizard);
        }

        match wizard.display() {
          Display::Content => {
            if shown_messages == 0 {
              match wizard.content() {
                ContentState::Ready(text) => println!("\n{}\n", text),
                ContentState::Failed(msg) => println!("\n❌ {}\n", msg),
                ContentState::Idle | ContentState::Loading => {}
              }
              shown_messages = wizard.messages().len().max(1);
            }
            let Some(line) = prompt(&mut input, "c=chat, b=back, n=new session, save <file.html>, q=quit> ").await? else { break };
            match line.as_str() {
              "q" => break,
              "c" => {
                shown_messages = 0;
                wizard.show_chat()
              }
              "b" => {
                shown_messages = 0;
                wizard.back()
              }
              "n" => {
                subjects = None;
                chapters = None;
                wizard.new_session()
              }
              s if s.starts_with("save ") => {
                export(&wizard, s.trim_start_matches("save ").trim()).await;
                wizard
              }
              _ => wizard,
            }
          }

          Display::Chat => {
            for m in wizard.messages().iter().skip(shown_messages) {
              let who = match m.role { Role::User => "you", Role::Assistant => "tutor" };
              let time = m.timestamp.as_deref().and_then(|t| t.get(11..19)).unwrap_or("");
              let mark = if m.error { "❌ " } else { "" };
              println!("\n[{} {}] {}{}", who, time, mark, m.content);
            }
            shown_messages = wizard.messages().len();

            let Some(line) = prompt(&mut input, "\nAsk a question (:content, :new, :quit)> ").await? else { break };
            match line.as_str() {
              ":quit" => break,
              ":content" => {
                shown_messages = 0;
                wizard.toggle_display()
              }
              ":new" => {
                subjects = None;
                chapters = None;
                wizard.new_session()
              }
              text => {
                let (next, request) = wizard.begin_send(text);
                match request {
                  Some(request) => {
                    println!("⏳ ...");
                    let result = client.chat(&request).await.map(|out| out.content);
                    if let Err(e) = &result {
                      warn!(target: "client", error = %e, "Chat request failed");
                    }
                    next.finish_send(result)
                  }
                  None => next,
                }
              }
            }
          }
        }
      }
    };
  }

  println!("Goodbye! ✨");
  Ok(())
}

async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
  use std::io::Write;
  print!("{}", label);
  std::io::stdout().flush()?;
  Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}

/// 1-based menu selection.
fn pick<'a, T>(choice: &str, items: &'a [T]) -> Option<&'a T> {
  let n = choice.parse::<usize>().ok()?;
  items.get(n.checked_sub(1)?)
}

fn print_header(wizard: &Wizard) {
  let ctx = wizard.context();
  let (Some(mode), Some(subject), Some(chapter)) = (ctx.mode, &ctx.subject, &ctx.chapter) else { return };
  println!("\n{} {} | {} {} | 📖 {}", mode.emoji(), mode, subject.icon, subject.name, chapter.name);
}

async fn export(wizard: &Wizard, path: &str) {
  let Some(page) = wizard.export_page() else {
    println!("Nothing to export yet.");
    return;
  };
  match write_page(path, &page).await {
    Ok(()) => println!("Saved {}", path),
    Err(e) => println!("Could not save {}: {}", path, e),
  }
}
