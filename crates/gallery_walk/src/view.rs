use bevy::prelude::*;
use bevy::ui::FocusPolicy;
use leafwing_input_manager::prelude::*;
use walk_helpers::input::{just_pressed_screen_position, just_pressed_world_position};
use walk_helpers::lifecycle::ViewScoped;

use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::grid::{GridModel, TileCoord};
use crate::input::{DirectionEvent, PadButton, WalkAction, create_input_map};
use crate::movement::{ControllerError, Direction, StepOutcome, WalkController};
use crate::proximity::ProximityChange;
use crate::repeat::HoldRepeat;
use crate::scroll::ScrollSynchronizer;
use crate::{AppState, WalkSet};

const AVATAR_IMAGE: &str = "gallery_millet.png";
const HINT_TEXT: &str = "Walk Millet over to the photos.\nTap a photo to see it larger.";

const PHOTO_Z: f32 = 5.0;
const AVATAR_Z: f32 = 10.0;
const HINT_Z: f32 = 30.0;

const INK: Color = Color::srgb(0.29, 0.29, 0.29);
const PHOTO_BORDER: Color = Color::srgb(0.659, 0.486, 0.337);
const PHOTO_BACKGROUND: Color = Color::srgb(0.898, 0.906, 0.922);
const AVATAR_COLOR: Color = Color::srgb(1.0, 0.5, 0.82);
const BUBBLE_COLOR: Color = Color::WHITE;
const HINT_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.8);
const PAD_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.9);
const PAD_BUTTON_COLOR: Color = Color::srgb(0.945, 0.945, 0.945);
const PAD_BUTTON_BORDER: Color = Color::srgb(0.82, 0.82, 0.82);
const POPUP_SHADE: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);

const CAPTION_WIDTH: f32 = 120.0;
const HINT_SIZE: Vec2 = Vec2::new(250.0, 44.0);
const HINT_GAP: f32 = 50.0;
const PAD_SIZE: f32 = 140.0;
const PAD_BUTTON_SIZE: f32 = 42.0;
const POPUP_SIZE: Vec2 = Vec2::new(250.0, 333.0);

#[derive(Component)]
pub struct Avatar;

#[derive(Component, Debug)]
pub struct PhotoTile {
    pub id: String,
}

#[derive(Component)]
pub struct CaptionBubble;

#[derive(Component)]
pub struct CaptionText;

#[derive(Component)]
pub struct FirstVisitHint;

#[derive(Component)]
pub struct BackButton;

#[derive(Component)]
pub struct PhotoPopup;

/// Round backing of the direction pad. Taps on it never reach the photos.
#[derive(Component)]
pub struct DirectionPad;

/// The avatar changed tile. Blocked steps do not send it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarMoved {
    pub from: TileCoord,
    pub to: TileCoord,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ProximityChanged(pub ProximityChange);

// The page is laid out in pixels with y down and the origin at the top-left
// corner of the gallery. The world is centred horizontally with y up.

pub fn pixel_to_world(grid: &GridModel, pixel: Vec2) -> Vec2 {
    Vec2::new(pixel.x - grid.pixel_extent().x / 2.0, -pixel.y)
}

pub fn world_to_pixel(grid: &GridModel, world: Vec2) -> Vec2 {
    Vec2::new(world.x + grid.pixel_extent().x / 2.0, -world.y)
}

pub fn tile_center_world(grid: &GridModel, coord: TileCoord) -> Vec2 {
    let half_tile = Vec2::splat(grid.tile_size() / 2.0);
    pixel_to_world(grid, grid.tile_to_pixel(coord) + half_tile)
}

fn footprint_center_world(grid: &GridModel, origin: TileCoord) -> Vec2 {
    let footprint = grid.footprint();
    let half_size =
        Vec2::new(footprint.width as f32, footprint.height as f32) * grid.tile_size() / 2.0;
    pixel_to_world(grid, grid.tile_to_pixel(origin) + half_size)
}

/// Top edge of the avatar in page pixels, measured from its rendered transform.
pub fn avatar_top_pixel(grid: &GridModel, translation: Vec3) -> f32 {
    world_to_pixel(grid, translation.truncate()).y - grid.tile_size() / 2.0
}

const fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

pub struct GalleryViewPlugin;

impl Plugin for GalleryViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AvatarMoved>()
            .add_event::<ProximityChanged>()
            .add_systems(
                Update,
                handle_back_button
                    .in_set(WalkSet::Input)
                    .run_if(in_state(AppState::Gallery))
                    .run_if(resource_exists::<WalkController>),
            )
            .add_systems(
                Update,
                apply_direction_events
                    .in_set(WalkSet::Movement)
                    .run_if(in_state(AppState::Gallery))
                    .run_if(resource_exists::<WalkController>),
            )
            .add_systems(
                Update,
                (sync_avatar, sync_caption, dismiss_hint, toggle_photo_popup)
                    .in_set(WalkSet::Presentation)
                    .run_if(in_state(AppState::Gallery))
                    .run_if(resource_exists::<WalkController>),
            );
    }
}

pub(crate) fn mount_gallery(
    mut commands: Commands,
    config: Res<GalleryConfig>,
    asset_server: Res<AssetServer>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let controller = match Catalog::embedded()
        .map_err(ControllerError::from)
        .and_then(|catalog| WalkController::mount(&catalog, &config))
    {
        Ok(controller) => controller,
        Err(err) => {
            error!("Could not open the gallery: {err}");
            next_state.set(AppState::Welcome);
            return;
        }
    };

    spawn_photos(&mut commands, controller.grid(), &asset_server);
    spawn_avatar(&mut commands, &controller, &asset_server);
    spawn_hint(&mut commands, &controller);
    spawn_back_button(&mut commands);
    spawn_direction_pad(&mut commands);

    commands.insert_resource(HoldRepeat::new(config.repeat_period()));
    commands.insert_resource(ScrollSynchronizer::default());
    commands.insert_resource(controller);
}

pub(crate) fn unmount_gallery(mut commands: Commands) {
    commands.remove_resource::<WalkController>();
    commands.remove_resource::<HoldRepeat>();
    commands.remove_resource::<ScrollSynchronizer>();
    info!("Gallery unmounted");
}

fn spawn_photos(commands: &mut Commands, grid: &GridModel, asset_server: &AssetServer) {
    let footprint = grid.footprint();
    let size = Vec2::new(footprint.width as f32, footprint.height as f32) * grid.tile_size();
    let inner = size - Vec2::splat(2.0);

    for obstacle in grid.obstacles() {
        let center = footprint_center_world(grid, obstacle.origin);
        commands
            .spawn((
                Sprite::from_color(PHOTO_BORDER, size),
                Transform::from_translation(center.extend(PHOTO_Z)),
                PhotoTile {
                    id: obstacle.id.clone(),
                },
                ViewScoped,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Sprite::from_color(PHOTO_BACKGROUND, inner),
                    Transform::from_xyz(0.0, 0.0, 0.1),
                ));
                if let Some(image) = &obstacle.image {
                    parent.spawn((
                        Sprite {
                            image: asset_server.load(image.as_str()),
                            custom_size: Some(inner),
                            ..default()
                        },
                        Transform::from_xyz(0.0, 0.0, 0.2),
                    ));
                }
            });
    }
}

fn spawn_avatar(commands: &mut Commands, controller: &WalkController, asset_server: &AssetServer) {
    let grid = controller.grid();
    let tile = grid.tile_size();
    let center = tile_center_world(grid, controller.position());
    let caption = controller.caption();

    commands
        .spawn((
            Sprite::from_color(AVATAR_COLOR, Vec2::splat(tile * 0.75)),
            Transform::from_translation(center.extend(AVATAR_Z)),
            Avatar,
            InputManagerBundle::<WalkAction> {
                input_map: create_input_map(),
                ..default()
            },
            ViewScoped,
        ))
        .with_children(|parent| {
            // Drawn over the coloured square, which shows until the image loads
            parent.spawn((
                Sprite {
                    image: asset_server.load(AVATAR_IMAGE),
                    custom_size: Some(Vec2::splat(tile)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));

            // Bubble above the head, shown while a photo is faced
            parent
                .spawn((
                    Sprite::from_color(BUBBLE_COLOR, Vec2::new(CAPTION_WIDTH, 22.0)),
                    Transform::from_xyz(0.0, tile * 0.5 + 16.0, 10.0),
                    visibility(caption.is_some()),
                    CaptionBubble,
                ))
                .with_children(|bubble| {
                    bubble.spawn((
                        Text2d::new(caption.unwrap_or_default()),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(INK),
                        Transform::from_xyz(0.0, 0.0, 0.1),
                        CaptionText,
                    ));
                });
        });
}

fn spawn_hint(commands: &mut Commands, controller: &WalkController) {
    let grid = controller.grid();
    let center = tile_center_world(grid, controller.position());
    let top = center.y - grid.tile_size() / 2.0 - HINT_GAP;

    commands
        .spawn((
            Sprite::from_color(HINT_COLOR, HINT_SIZE),
            Transform::from_xyz(center.x, top - HINT_SIZE.y / 2.0, HINT_Z),
            visibility(controller.hint_visible()),
            FirstVisitHint,
            ViewScoped,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new(HINT_TEXT),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(INK),
                TextLayout::new_with_justify(JustifyText::Center),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
        });
}

fn spawn_back_button(commands: &mut Commands) {
    commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(4.0),
                width: Val::Px(32.0),
                height: Val::Px(32.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::NONE),
            GlobalZIndex(110),
            BackButton,
            ViewScoped,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("<"),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(INK),
            ));
        });
}

fn pad_button_node(direction: Direction) -> Node {
    let inset = Val::Px(8.0);
    let centered = Val::Px((PAD_SIZE - PAD_BUTTON_SIZE) / 2.0);
    let (top, bottom, left, right) = match direction {
        Direction::Up => (inset, Val::Auto, centered, Val::Auto),
        Direction::Down => (Val::Auto, inset, centered, Val::Auto),
        Direction::Left => (centered, Val::Auto, inset, Val::Auto),
        Direction::Right => (centered, Val::Auto, Val::Auto, inset),
    };

    Node {
        position_type: PositionType::Absolute,
        top,
        bottom,
        left,
        right,
        width: Val::Px(PAD_BUTTON_SIZE),
        height: Val::Px(PAD_BUTTON_SIZE),
        border: UiRect::all(Val::Px(1.0)),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

const fn pad_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "^",
        Direction::Down => "v",
        Direction::Left => "<",
        Direction::Right => ">",
    }
}

fn spawn_direction_pad(commands: &mut Commands) {
    use strum::IntoEnumIterator;

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Percent(18.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-PAD_SIZE / 2.0)),
                width: Val::Px(PAD_SIZE),
                height: Val::Px(PAD_SIZE),
                ..default()
            },
            BackgroundColor(PAD_COLOR),
            BorderRadius::MAX,
            GlobalZIndex(100),
            Interaction::None,
            FocusPolicy::Block,
            DirectionPad,
            ViewScoped,
        ))
        .with_children(|pad| {
            for direction in Direction::iter() {
                pad.spawn((
                    Button,
                    pad_button_node(direction),
                    BackgroundColor(PAD_BUTTON_COLOR),
                    BorderColor(PAD_BUTTON_BORDER),
                    BorderRadius::all(Val::Percent(40.0)),
                    PadButton(direction),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(pad_label(direction)),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(INK),
                    ));
                });
            }
        });
}

fn spawn_photo_popup(commands: &mut Commands, image: Handle<Image>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(POPUP_SHADE),
            GlobalZIndex(50),
            PhotoPopup,
            ViewScoped,
        ))
        .with_children(|parent| {
            parent.spawn((
                ImageNode::new(image),
                Node {
                    width: Val::Px(POPUP_SIZE.x),
                    height: Val::Px(POPUP_SIZE.y),
                    ..default()
                },
            ));
        });
}

/// Steps the controller once per event, in the order the events were sent.
///
/// While a photo is open the events are dropped and any held direction is let go.
fn apply_direction_events(
    mut directions: EventReader<DirectionEvent>,
    mut controller: ResMut<WalkController>,
    mut moves: EventWriter<AvatarMoved>,
    mut proximity_changes: EventWriter<ProximityChanged>,
    popups: Query<(), With<PhotoPopup>>,
    hold: Option<ResMut<HoldRepeat>>,
) {
    if !popups.is_empty() {
        directions.clear();
        if let Some(direction) = hold.and_then(|mut hold| hold.release()) {
            debug!("Photo open, {direction} released");
        }
        return;
    }

    for &DirectionEvent(direction) in directions.read() {
        if let StepOutcome::Moved {
            from,
            to,
            proximity,
        } = controller.step(direction)
        {
            moves.send(AvatarMoved { from, to });
            if let Some(change) = proximity {
                proximity_changes.send(ProximityChanged(change));
            }
        }
    }
}

fn sync_avatar(controller: Res<WalkController>, mut avatars: Query<&mut Transform, With<Avatar>>) {
    if !controller.is_changed() {
        return;
    }

    let center = tile_center_world(controller.grid(), controller.position());
    for mut transform in &mut avatars {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
    }
}

fn sync_caption(
    mut changes: EventReader<ProximityChanged>,
    controller: Res<WalkController>,
    mut bubbles: Query<&mut Visibility, With<CaptionBubble>>,
    mut texts: Query<&mut Text2d, With<CaptionText>>,
) {
    if changes.read().last().is_none() {
        return;
    }

    let caption = controller.caption();
    for mut bubble in &mut bubbles {
        *bubble = visibility(caption.is_some());
    }
    if let Some(caption) = caption {
        for mut text in &mut texts {
            caption.clone_into(&mut text.0);
        }
    }
}

fn dismiss_hint(
    mut commands: Commands,
    controller: Res<WalkController>,
    hints: Query<Entity, With<FirstVisitHint>>,
) {
    if controller.hint_visible() {
        return;
    }

    for entity in &hints {
        commands.entity(entity).despawn_recursive();
    }
}

fn handle_back_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<BackButton>)>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if buttons
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        info!("Leaving the gallery");
        next_state.set(AppState::Welcome);
    }
}

fn toggle_photo_popup(
    mut commands: Commands,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    controller: Res<WalkController>,
    asset_server: Res<AssetServer>,
    popups: Query<Entity, With<PhotoPopup>>,
    controls: Query<&Interaction, Or<(With<Button>, With<DirectionPad>)>>,
) {
    if let Ok(popup) = popups.get_single() {
        if just_pressed_screen_position(&mouse_buttons, &touches, &windows).is_some() {
            commands.entity(popup).despawn_recursive();
        }
        return;
    }

    // Presses on the pad or the back button are not photo taps
    if controls
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        return;
    }

    let Some(world_position) =
        just_pressed_world_position(&mouse_buttons, &touches, &windows, &cameras)
    else {
        return;
    };

    let grid = controller.grid();
    let Some(obstacle) = grid.obstacle_at_pixel(world_to_pixel(grid, world_position)) else {
        return;
    };
    let Some(image) = &obstacle.image else {
        return;
    };

    info!("Opening photo {}", obstacle.id);
    spawn_photo_popup(&mut commands, asset_server.load(image.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery() -> GridModel {
        let catalog = Catalog::embedded().expect("embedded catalog");
        GridModel::new(&catalog, &GalleryConfig::default()).expect("embedded grid")
    }

    #[test]
    fn test_pixel_world_round_trip() {
        let grid = gallery();
        let pixel = Vec2::new(40.0, 300.0);
        let world = pixel_to_world(&grid, pixel);
        assert_eq!(world, Vec2::new(40.0 - 176.0, -300.0), "centred, y up");
        assert_eq!(world_to_pixel(&grid, world), pixel, "back to the page");
    }

    #[test]
    fn test_tile_center_and_avatar_top() {
        let grid = gallery();
        let center = tile_center_world(&grid, TileCoord::new(5, 3));
        // 11 tiles of 32 px, column 5 is the middle one
        assert_eq!(center, Vec2::new(0.0, -112.0), "tile centre");
        assert_eq!(avatar_top_pixel(&grid, center.extend(AVATAR_Z)), 96.0, "3 * 32");
    }

    #[test]
    fn test_photo_centres_hit_their_photo() {
        let grid = gallery();
        for obstacle in grid.obstacles() {
            let center = footprint_center_world(&grid, obstacle.origin);
            let hit = grid
                .obstacle_at_pixel(world_to_pixel(&grid, center))
                .map(|hit| hit.id.as_str());
            assert_eq!(hit, Some(obstacle.id.as_str()), "centre of {}", obstacle.id);
        }
    }

    #[test]
    fn test_directions_are_dropped_while_a_photo_is_open() {
        use core::time::Duration;

        use bevy::ecs::system::RunSystemOnce;

        let catalog = Catalog::embedded().expect("embedded catalog");
        let controller =
            WalkController::mount(&catalog, &GalleryConfig::default()).expect("mount");
        let start = controller.position();

        let mut world = World::new();
        world.init_resource::<Events<DirectionEvent>>();
        world.init_resource::<Events<AvatarMoved>>();
        world.init_resource::<Events<ProximityChanged>>();
        world.insert_resource(controller);
        let mut hold = HoldRepeat::new(Duration::from_millis(150));
        hold.press(Direction::Down);
        world.insert_resource(hold);

        let popup = world.spawn(PhotoPopup).id();
        world.send_event(DirectionEvent(Direction::Down));
        world
            .run_system_once(apply_direction_events)
            .expect("system runs");
        assert_eq!(world.resource::<WalkController>().position(), start, "no step");
        assert_eq!(world.resource::<HoldRepeat>().held(), None, "hold let go");

        world.despawn(popup);
        world.send_event(DirectionEvent(Direction::Down));
        world
            .run_system_once(apply_direction_events)
            .expect("system runs");
        assert_eq!(
            world.resource::<WalkController>().position(),
            start + TileCoord::new(0, 1),
            "steps again once closed"
        );
    }

    #[test]
    fn test_avatar_image_ships_with_the_crate() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join(AVATAR_IMAGE);
        let bytes = std::fs::read(&path).expect("avatar image is readable");
        assert!(bytes.starts_with(b"\x89PNG"), "{} is a png", path.display());
    }
}
