use anyhow::Context as _;
use gemini_agent::{attachment, prompts, AssistantChat, Synthesizer};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use wyd_core::session::{Confirmation, FocusTick, Session, Stage};
use wyd_core::views;

use super::{block_on, synthesizer, Backend, Context};
use crate::render;

const HELP: &str = "\
Comandos:
  dashboard | d          tu mapa de misiones y estadísticas
  missions | m           lista de misiones
  complete <nivel>       marcar una misión manual como hecha
  undo <nivel>           desmarcar una misión (si está permitido)
  focus start|cancel     modo enfoque
  focus                  tiempo restante
  community | c          actividad de la comunidad
  profile | p            tu perfil
  chat <mensaje>         hablar con el asistente
  logout                 cerrar sesión
  quit                   salir";

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.load_config()?;
    let synth = synthesizer(ctx, &config)?;
    let session = Session::new(&config);
    block_on(Repl::new(session, synth).run())?
}

// ---------------------------------------------------------------------------
// Repl
// ---------------------------------------------------------------------------

struct Repl {
    session: Session,
    synth: Synthesizer<Backend>,
    /// Assistant chat history; restarts on logout.
    assistant: AssistantChat,
}

enum Flow {
    Continue,
    Quit,
}

impl Repl {
    fn new(session: Session, synth: Synthesizer<Backend>) -> Self {
        Self {
            session,
            synth,
            assistant: AssistantChat::new(),
        }
    }

    async fn run(mut self) -> anyhow::Result<()> {
        println!("WYD: convierte tus metas en una aventura.");
        println!("Escribe 'login' para empezar o 'quit' para salir.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read input")? else {
                        break;
                    };
                    if let Flow::Quit = self.handle(line.trim()).await? {
                        break;
                    }
                }
                _ = ticker.tick() => self.on_tick(),
            }
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        match self.session.tick_focus(Duration::from_secs(1)) {
            FocusTick::Expired(Some(outcome)) => {
                println!("⏰ ¡Sesión de enfoque completada!");
                render::completion(&outcome);
            }
            FocusTick::Expired(None) => {
                println!("⏰ Sesión de enfoque completada. No había misiones de enfoque pendientes.");
            }
            FocusTick::Running { .. } | FocusTick::Inactive => {}
        }
    }

    async fn handle(&mut self, line: &str) -> anyhow::Result<Flow> {
        if line == "quit" || line == "exit" {
            return Ok(Flow::Quit);
        }
        match self.session.stage() {
            Stage::LoggedOut => self.logged_out(line),
            Stage::Onboarding => self.onboarding(line).await?,
            Stage::Playing => self.playing(line).await?,
        }
        Ok(Flow::Continue)
    }

    // -----------------------------------------------------------------------
    // Logged out
    // -----------------------------------------------------------------------

    fn logged_out(&mut self, line: &str) {
        if line != "login" {
            println!("Escribe 'login' para empezar.");
            return;
        }
        match self.session.login() {
            Ok(onboarding) => {
                for msg in onboarding.messages() {
                    render::message(msg);
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    // -----------------------------------------------------------------------
    // Onboarding
    // -----------------------------------------------------------------------

    async fn onboarding(&mut self, line: &str) -> anyhow::Result<()> {
        let onboarding = self.session.onboarding_mut()?;

        if onboarding.is_ready() && (line == "empezar" || line.is_empty()) {
            return self.finish_onboarding().await;
        }

        // A number picks one of the offered goals.
        let choice = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| onboarding.open_options().get(i).cloned());

        let sent = if let Some(option) = choice {
            onboarding.choose_goal(&option).map(|_| ())
        } else if let Some(rest) = line.strip_prefix("/attach ") {
            let (path, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let file = match attachment::read(Path::new(path)) {
                Ok(f) => f,
                Err(e) => {
                    println!("No se pudo leer el archivo: {e}");
                    return Ok(());
                }
            };
            let text = if text.trim().is_empty() {
                attachment::default_caption(&file)
            } else {
                text.to_string()
            };
            onboarding.send(&text, Some(file)).map(|_| ())
        } else {
            onboarding.send(line, None).map(|_| ())
        };
        if let Err(e) = sent {
            println!("{e}");
            return Ok(());
        }

        println!("Wyz está escribiendo...");
        let history = onboarding.messages().to_vec();
        let reply = self.synth.onboarding_reply(&history).await;

        let onboarding = self.session.onboarding_mut()?;
        onboarding.receive(reply);
        if let Some(last) = onboarding.messages().last() {
            render::message(last);
        }
        if onboarding.is_ready() {
            println!("Escribe 'empezar' para comenzar tu aventura.");
        }
        Ok(())
    }

    async fn finish_onboarding(&mut self) -> anyhow::Result<()> {
        println!("Diseñando tu Aventura...");
        let onboarding = self.session.onboarding_mut()?;
        let name = onboarding.user_name().unwrap_or_default().to_string();
        let history = onboarding.messages().to_vec();

        let result = self.synth.synthesize_plan(&history).await;
        if result.is_fallback() {
            println!("(No pudimos diseñar tu plan; aquí tienes una misión de rescate.)");
        }
        self.session
            .complete_onboarding(name, result.plan)
            .context("failed to start the adventure")?;

        render::dashboard(&views::dashboard(self.session.state()));
        println!();
        println!("Escribe 'help' para ver los comandos.");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Playing
    // -----------------------------------------------------------------------

    async fn playing(&mut self, line: &str) -> anyhow::Result<()> {
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        match command {
            "" => {}
            "help" | "h" | "?" => println!("{HELP}"),
            "dashboard" | "d" => render::dashboard(&views::dashboard(self.session.state())),
            "missions" | "m" => render::missions(&views::missions(self.session.state())),
            "community" | "c" => render::community(&views::community(self.session.state())),
            "profile" | "p" => render::profile(&views::profile(self.session.state())),
            "complete" | "done" => {
                let Some(level) = parse_level(arg) else {
                    return Ok(());
                };
                match self.session.confirm_mission(level)? {
                    Confirmation::Done(outcome) => render::completion(&outcome),
                    Confirmation::NeedsVerification { verification, .. } => {
                        println!("{}", render::verification_hint(verification))
                    }
                }
            }
            "undo" => {
                let Some(level) = parse_level(arg) else {
                    return Ok(());
                };
                render::uncompletion(&self.session.uncomplete_mission(level)?);
            }
            "focus" => self.focus(arg)?,
            "chat" => self.chat(arg).await,
            "logout" => {
                self.session.logout();
                self.assistant.clear();
                println!("Sesión cerrada. Escribe 'login' para empezar de nuevo.");
            }
            other => println!("Comando desconocido: {other}. Escribe 'help'."),
        }
        Ok(())
    }

    fn focus(&mut self, arg: &str) -> anyhow::Result<()> {
        match arg {
            "start" => {
                if self.session.start_focus()? {
                    let left = self
                        .session
                        .focus_timer()
                        .map(|t| t.display())
                        .unwrap_or_default();
                    println!("Modo Enfoque iniciado ({left}). Concéntrate en tu misión actual.");
                } else {
                    println!("Ya hay una sesión de enfoque en curso.");
                }
            }
            "cancel" | "stop" => {
                self.session.cancel_focus();
                println!("Sesión de enfoque cancelada.");
            }
            _ => match self.session.focus_timer() {
                Some(t) if t.is_running() => println!("Modo Enfoque: {}", t.display()),
                _ => println!("No hay una sesión de enfoque activa. Usa 'focus start'."),
            },
        }
        Ok(())
    }

    async fn chat(&mut self, text: &str) {
        // The greeting is shown on screen only; it never enters the history.
        if text.is_empty() || self.assistant.history().is_empty() {
            println!("Wyz: {}", prompts::assistant_greeting(self.session.state()));
        }
        if text.is_empty() {
            return;
        }
        let reply = self
            .synth
            .assistant_turn(&mut self.assistant, self.session.state(), text)
            .await;
        println!("Wyz: {reply}");
    }
}

fn parse_level(arg: &str) -> Option<u32> {
    match arg.parse::<u32>() {
        Ok(level) => Some(level),
        Err(_) => {
            println!("Indica el nivel de la misión, por ejemplo: complete 1");
            None
        }
    }
}
