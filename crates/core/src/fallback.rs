//! Sample data shown when the project list cannot be loaded.

use crate::record::{Coordinates, MediaItem, ProjectRecord};

/// The fixed sample list substituted when the initial fetch fails.
pub fn sample_projects() -> Vec<ProjectRecord> {
    vec![ProjectRecord {
        id: "arena_maipu_default".to_string(),
        name: "Arenas de Maipú (Ejemplo de Fallback)".to_string(),
        coordinates: Coordinates::new(-32.9750, -68.7750),
        short_description:
            "Un oasis de tranquilidad con lotes listos para construir (datos de fallback)."
                .to_string(),
        long_description: "Arenas de Maipú ofrece lotes desde 300m² en un entorno seguro y con \
             acceso a servicios. Ideal para quienes buscan un estilo de vida conectado con la \
             naturaleza sin alejarse de la ciudad. Contamos con espacios verdes comunes y \
             financiación a medida. (Estos son datos de fallback)."
            .to_string(),
        media: vec![
            MediaItem::image(
                "https://picsum.photos/seed/arena_maipu_1_fallback/800/450",
                "Vista aérea de Arenas de Maipú (Fallback)",
            ),
            MediaItem::image(
                "https://picsum.photos/seed/arena_maipu_2_fallback/800/450",
                "Lote modelo en Arenas de Maipú (Fallback)",
            ),
        ],
    }]
}
