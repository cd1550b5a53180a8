use bevy::prelude::*;
use bevy::ui::RelativeCursorPosition;
use leafwing_input_manager::prelude::*;
use strum::IntoEnumIterator;
use walk_helpers::input::pointer_just_released;

use crate::movement::Direction;
use crate::repeat::HoldRepeat;
use crate::view::Avatar;
use crate::{AppState, WalkSet};

#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum WalkAction {
    Up,
    Down,
    Left,
    Right,
}

impl From<Direction> for WalkAction {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

/// Arrow keys and WASD both walk.
pub fn create_input_map() -> InputMap<WalkAction> {
    let mut input_map = InputMap::default();

    input_map.insert(WalkAction::Up, KeyCode::ArrowUp);
    input_map.insert(WalkAction::Up, KeyCode::KeyW);
    input_map.insert(WalkAction::Down, KeyCode::ArrowDown);
    input_map.insert(WalkAction::Down, KeyCode::KeyS);
    input_map.insert(WalkAction::Left, KeyCode::ArrowLeft);
    input_map.insert(WalkAction::Left, KeyCode::KeyA);
    input_map.insert(WalkAction::Right, KeyCode::ArrowRight);
    input_map.insert(WalkAction::Right, KeyCode::KeyD);

    input_map
}

/// One requested step, read only by the gallery that is currently open.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionEvent(pub Direction);

/// A button of the on-screen direction pad.
///
/// Spawned with a `RelativeCursorPosition` so dragging off the button can be seen.
#[derive(Component, Debug, Clone, Copy)]
#[require(RelativeCursorPosition)]
pub struct PadButton(pub Direction);

pub struct WalkInputPlugin;

impl Plugin for WalkInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<WalkAction>::default())
            .add_event::<DirectionEvent>()
            .add_systems(
                Update,
                (
                    read_keyboard,
                    read_direction_pad,
                    release_on_pad_leave,
                    release_on_pointer_up,
                    repeat_held_direction,
                )
                    .chain()
                    .in_set(WalkSet::Input)
                    .run_if(in_state(AppState::Gallery))
                    .run_if(resource_exists::<HoldRepeat>),
            );
    }
}

fn read_keyboard(
    actions: Query<&ActionState<WalkAction>, With<Avatar>>,
    mut hold: ResMut<HoldRepeat>,
    mut directions: EventWriter<DirectionEvent>,
) {
    let Ok(action_state) = actions.get_single() else {
        return;
    };

    for direction in Direction::iter() {
        let action = WalkAction::from(direction);
        if action_state.just_pressed(&action) {
            directions.send(DirectionEvent(hold.press(direction)));
        } else if action_state.just_released(&action) {
            hold.release_if(direction);
        }
    }
}

fn read_direction_pad(
    buttons: Query<(&Interaction, &PadButton), Changed<Interaction>>,
    mut hold: ResMut<HoldRepeat>,
    mut directions: EventWriter<DirectionEvent>,
) {
    for (interaction, &PadButton(direction)) in &buttons {
        match interaction {
            Interaction::Pressed => {
                directions.send(DirectionEvent(hold.press(direction)));
            }
            // Released over the button
            Interaction::Hovered | Interaction::None => {
                hold.release_if(direction);
            }
        }
    }
}

// A pressed button stays `Pressed` while the pointer is dragged away from it.
fn release_on_pad_leave(
    buttons: Query<(&PadButton, &RelativeCursorPosition)>,
    mut hold: ResMut<HoldRepeat>,
) {
    for (&PadButton(direction), cursor) in &buttons {
        if !cursor.mouse_over() && hold.release_if(direction) {
            debug!("Pointer left the {direction} button");
        }
    }
}

// Touch ends do not always reach the button, stop on any release.
fn release_on_pointer_up(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut hold: ResMut<HoldRepeat>,
) {
    if pointer_just_released(&mouse_buttons, &touches) {
        if let Some(direction) = hold.release() {
            debug!("Released {direction}");
        }
    }
}

fn repeat_held_direction(
    time: Res<Time>,
    mut hold: ResMut<HoldRepeat>,
    mut directions: EventWriter<DirectionEvent>,
) {
    if let Some((direction, repeats)) = hold.tick(time.delta()) {
        for _ in 0..repeats {
            directions.send(DirectionEvent(direction));
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    fn cursor_at(x: f32) -> RelativeCursorPosition {
        RelativeCursorPosition {
            normalized_visible_node_rect: Rect::new(-0.5, -0.5, 0.5, 0.5),
            normalized: Some(Vec2::new(x, 0.0)),
        }
    }

    #[test]
    fn test_dragging_off_a_held_button_stops_the_repeat() {
        let mut world = World::new();
        let mut hold = HoldRepeat::new(Duration::from_millis(150));
        hold.press(Direction::Down);
        world.insert_resource(hold);

        let down = world
            .spawn((PadButton(Direction::Down), Interaction::Pressed, cursor_at(0.0)))
            .id();
        world.spawn((PadButton(Direction::Up), cursor_at(2.0)));

        world
            .run_system_once(release_on_pad_leave)
            .expect("system runs");
        assert_eq!(
            world.resource::<HoldRepeat>().held(),
            Some(Direction::Down),
            "still over the held button, other buttons do not matter"
        );

        world.entity_mut(down).insert(cursor_at(0.9));
        world
            .run_system_once(release_on_pad_leave)
            .expect("system runs");
        assert_eq!(
            world.resource::<HoldRepeat>().held(),
            None,
            "released once the pointer left the button"
        );
    }
}
