//! Fixed instruction texts and the mission-plan response schema.

use serde_json::{json, Value};
use wyd_core::engine::GameState;
use wyd_core::mission::PLAN_LENGTH;

pub const ONBOARDING_SYSTEM: &str = "Eres Wyz, un Director de Juego personal, amigable y motivador. \
Tu objetivo es guiar al usuario a través de una configuración inicial para gamificar sus metas. \
Sigue este flujo: 1. Pregunta su nombre. 2. Después de que respondan, salúdalos por su nombre y \
pregúntales sobre su objetivo principal. 3. Una vez que especifiquen su objetivo, haz preguntas de \
sondeo para entenderlo mejor, puedes pedirles que adjunten documentos o imágenes si ayuda. \
4. Cuando sientas que tienes suficiente información, di exactamente la frase: 'Perfecto. He \
diseñado un plan de misiones inicial para ti. ¿Listo para empezar?' y nada más. Sé conciso y \
mantén un tono de aventura. No uses markdown.";

pub const PLAN_INSTRUCTION: &str = "Actúa como un diseñador de juegos experto. Basándote en toda la \
conversación anterior, crea un plan de misiones inicial para el usuario. El plan debe consistir en \
un título temático para la aventura, una breve descripción y una lista de exactamente 5 misiones \
accionables y secuenciales que ayuden al usuario a alcanzar su objetivo. Cada misión indica cómo se \
verifica (manual, focus_mode, api o social) y su recompensa en XP y monedas; las misiones manuales \
nunca dan monedas. Responde únicamente con el objeto JSON estructurado.";

pub const ONBOARDING_APOLOGY: &str = "Parece que hay una interferencia en nuestra comunicación. \
¡Pero no te preocupes, la aventura debe continuar! ¿Estás listo?";

pub const ASSISTANT_APOLOGY: &str = "Lo siento, ocurrió un error. Inténtalo de nuevo.";

pub fn assistant_greeting(state: &GameState) -> String {
    format!(
        "Hola {}, ¿en qué te puedo ayudar hoy con tu aventura?",
        state.display_name()
    )
}

/// System instruction for the in-app assistant, grounded in the user's
/// current plan and progress.
pub fn assistant_system(state: &GameState) -> String {
    let mut text = String::from(
        "Eres un asistente de IA servicial y amigable dentro de la aplicación de productividad WYD. \
         Ayuda a los usuarios con sus preguntas sobre productividad, establecimiento de metas o \
         cualquier otra cosa que necesiten.",
    );
    text.push_str(&format!("\n\nUsuario: {}.", state.display_name()));
    let p = &state.progression;
    text.push_str(&format!(
        " Nivel {}, {}/{} XP, {} monedas.",
        p.level, p.xp, p.xp_to_next_level, p.coins
    ));
    if let Some(plan) = &state.plan {
        text.push_str(&format!("\nPlan: \"{}\". {}", plan.title, plan.description));
        for m in &plan.missions {
            let mark = if m.completed { "x" } else { " " };
            text.push_str(&format!("\n[{mark}] {}. {}", m.level, m.title));
        }
    }
    text
}

/// JSON schema the plan response must follow. Every field is required.
pub fn mission_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "Un nombre de mapa o aventura creativo y temático para el plan. Por ejemplo: 'El Mapa del Saber' o 'La Senda del Atleta'."
            },
            "description": {
                "type": "STRING",
                "description": "Una breve descripción de 1 frase del objetivo general del plan."
            },
            "missions": {
                "type": "ARRAY",
                "description": format!("Una lista de exactamente {PLAN_LENGTH} misiones o niveles secuenciales."),
                "minItems": PLAN_LENGTH,
                "maxItems": PLAN_LENGTH,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "level": { "type": "INTEGER", "description": "El número del nivel, comenzando desde 1." },
                        "title": { "type": "STRING", "description": "Un título de misión corto y accionable." },
                        "description": { "type": "STRING", "description": "Qué debe hacer el usuario para completarla." },
                        "completed": { "type": "BOOLEAN", "description": "Siempre debe ser `false` inicialmente." },
                        "verificationType": {
                            "type": "STRING",
                            "enum": ["manual", "focus_mode", "api", "social"],
                            "description": "Cómo se verifica la misión."
                        },
                        "rewardXP": { "type": "INTEGER", "description": "Experiencia otorgada al completarla." },
                        "rewardCoins": { "type": "INTEGER", "description": "Monedas otorgadas; 0 si la verificación es manual." }
                    },
                    "required": ["level", "title", "description", "completed", "verificationType", "rewardXP", "rewardCoins"]
                }
            }
        },
        "required": ["title", "description", "missions"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wyd_core::mission::fallback_plan;
    use wyd_core::progression::Progression;

    #[test]
    fn schema_requires_every_mission_field() {
        let schema = mission_plan_schema();
        let required = schema["properties"]["missions"]["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 7);
        assert!(required.contains(&json!("rewardXP")));
        assert_eq!(schema["properties"]["missions"]["maxItems"], json!(5));
    }

    #[test]
    fn assistant_context_lists_missions() {
        let mut state = GameState::new(Progression::default());
        state.plan = Some(fallback_plan());
        state.plan.as_mut().unwrap().missions[0].completed = true;
        let text = assistant_system(&state);
        assert!(text.contains("Usuario: Aventurero."));
        assert!(text.contains("[x] 1. Revisar la conexión con la IA"));
        assert!(text.contains("[ ] 2. Reintentar la creación del plan"));
        assert_eq!(
            assistant_greeting(&state),
            "Hola Aventurero, ¿en qué te puedo ayudar hoy con tu aventura?"
        );
    }
}
