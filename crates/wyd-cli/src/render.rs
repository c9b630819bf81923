use crate::output::print_table;
use wyd_core::engine::{Completion, Uncompletion};
use wyd_core::mission::MissionPlan;
use wyd_core::onboarding::Message;
use wyd_core::types::{Sender, VerificationType};
use wyd_core::views::{CommunityEntry, DashboardView, MissionRow, MissionStatus, ProfileView};

pub fn message(msg: &Message) {
    let who = match msg.sender {
        Sender::Ai => "Wyz",
        Sender::User => "Tú",
    };
    println!("{who}: {}", msg.text);
    if let Some(file) = &msg.file {
        let name = file.file_name.as_deref().unwrap_or("archivo");
        println!("     [adjunto: {name} ({})]", file.mime_type);
    }
    for (i, opt) in msg.options.iter().enumerate() {
        println!("     {}. {}", i + 1, opt.label);
    }
}

pub fn dashboard(view: &DashboardView) {
    println!("== {} ==", view.user);
    println!(
        "Nivel {}  |  {}/{} XP ({}%)  |  {} monedas",
        view.level, view.xp, view.xp_to_next_level, view.percent_to_next, view.coins
    );
    match &view.plan_title {
        None => {
            println!("No se ha encontrado ningún plan de misiones.");
            return;
        }
        Some(title) => {
            println!();
            println!("{title}");
            if let Some(desc) = view.plan_description.as_deref().filter(|d| !d.is_empty()) {
                println!("{desc}");
            }
        }
    }
    println!();
    for m in &view.missions {
        let marker = match m.status {
            MissionStatus::Completed => "✓".to_string(),
            _ => m.level.to_string(),
        };
        let current = if m.status == MissionStatus::Current {
            "  <- Misión Actual"
        } else {
            ""
        };
        println!("({marker}) {}{current}", m.title);
    }
}

pub fn missions(rows: &[MissionRow]) {
    if rows.is_empty() {
        println!("No hay misiones disponibles.");
        return;
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|m| {
            vec![
                m.level.to_string(),
                if m.status == MissionStatus::Completed {
                    "✓".into()
                } else {
                    " ".into()
                },
                m.title.clone(),
                m.verification.to_string(),
                reward(m.reward_xp, m.reward_coins),
            ]
        })
        .collect();
    print_table(&["LVL", "OK", "TITLE", "VERIFY", "REWARD"], table);
}

pub fn plan(plan: &MissionPlan) {
    println!("{}", plan.title);
    if !plan.description.is_empty() {
        println!("{}", plan.description);
    }
    println!();
    for m in &plan.missions {
        println!(
            "{}. {} [{}] {}",
            m.level,
            m.title,
            m.verification_type,
            reward(m.reward_xp, m.reward_coins)
        );
        if !m.description.is_empty() {
            println!("   {}", m.description);
        }
    }
}

pub fn community(entries: &[CommunityEntry]) {
    println!("Comunidad: tu red de apoyo para la aventura.");
    for e in entries {
        println!("- {}", e.text);
    }
}

pub fn profile(view: &ProfileView) {
    println!("{}", view.user);
    println!("Nivel {}  |  {} monedas", view.level, view.coins);
    println!(
        "Misiones completadas: {}  |  Misiones totales: {}",
        view.completed, view.total
    );
}

pub fn completion(outcome: &Completion) {
    match outcome {
        Completion::Completed(r) => {
            println!("¡Misión completada: {}! {}", r.title, reward(r.xp, r.coins));
            if r.levels_gained > 0 {
                println!("¡Subiste de nivel! (+{})", r.levels_gained);
            }
        }
        Completion::Restored { level } => {
            println!("Misión {level} marcada de nuevo como completada (recompensa ya cobrada).")
        }
        Completion::AlreadyCompleted { level } => println!("La misión {level} ya está completada."),
        Completion::NotFound { level } => println!("No existe una misión de nivel {level}."),
        Completion::NoPlan => println!("Aún no tienes un plan de misiones."),
    }
}

pub fn uncompletion(outcome: &Uncompletion) {
    match outcome {
        Uncompletion::Reopened { level } => println!("Misión {level} marcada como pendiente."),
        Uncompletion::NotCompleted { level } => println!("La misión {level} no está completada."),
        Uncompletion::NotAllowed { .. } => {
            println!("Desmarcar misiones está desactivado (missions.allow_uncomplete).")
        }
        Uncompletion::NotFound { level } => println!("No existe una misión de nivel {level}."),
        Uncompletion::NoPlan => println!("Aún no tienes un plan de misiones."),
    }
}

/// How a mission of this kind gets verified, for the mission detail text.
pub fn verification_hint(kind: VerificationType) -> &'static str {
    match kind {
        VerificationType::Manual => {
            "Esta misión se basa en el sistema de honor. ¡Completa la tarea y márcala como hecha!"
        }
        VerificationType::FocusMode => {
            "Para ganar Monedas, debes usar el Modo Enfoque: escribe 'focus start'."
        }
        VerificationType::Api | VerificationType::Social => {
            "Esta misión se verifica automáticamente."
        }
    }
}

fn reward(xp: u32, coins: u32) -> String {
    if coins > 0 {
        format!("+{xp} XP | +{coins} monedas")
    } else {
        format!("+{xp} XP")
    }
}
