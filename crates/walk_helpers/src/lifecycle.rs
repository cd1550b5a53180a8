use bevy::prelude::*;

/// Root entities owned by the active view. They are despawned, with their
/// children, when the view is left.
#[derive(Component)]
pub struct ViewScoped;

pub fn despawn_view_scoped(mut commands: Commands, query: Query<Entity, With<ViewScoped>>) {
    let mut count = 0;
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
        count += 1;
    }
    debug!("Despawned {count} view scoped entities");
}
