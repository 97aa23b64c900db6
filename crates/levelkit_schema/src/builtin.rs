//! The built-in schema table.
//!
//! Covers the common object fields, the shared trigger fields, and the
//! trigger types that reference groups, items, colours, collision blocks,
//! or control ids. Types not listed here only accept the common fields.

use levelkit_foundation::{FieldType, Namespace};

use crate::table::{FieldDef, SchemaTable, TypeSchema};

/// Field key constants.
pub mod props {
    use levelkit_foundation::FieldKey;

    /// Identity field (entity type).
    pub const ID: FieldKey = FieldKey::ID;
    /// Horizontal position.
    pub const X: FieldKey = FieldKey::new(2);
    /// Vertical position.
    pub const Y: FieldKey = FieldKey::new(3);
    /// Horizontal flip.
    pub const FLIP_X: FieldKey = FieldKey::new(4);
    /// Vertical flip.
    pub const FLIP_Y: FieldKey = FieldKey::new(5);
    /// Rotation in degrees.
    pub const ROTATION: FieldKey = FieldKey::new(6);
    /// Red channel of a colour trigger.
    pub const RED: FieldKey = FieldKey::new(7);
    /// Green channel of a colour trigger.
    pub const GREEN: FieldKey = FieldKey::new(8);
    /// Blue channel of a colour trigger.
    pub const BLUE: FieldKey = FieldKey::new(9);
    /// Trigger duration in seconds.
    pub const DURATION: FieldKey = FieldKey::new(10);
    /// Trigger fires on touch.
    pub const TOUCH_TRIGGER: FieldKey = FieldKey::new(11);
    /// Trigger shows an editor preview.
    pub const EDITOR_PREVIEW: FieldKey = FieldKey::new(13);
    /// Primary editor layer.
    pub const EDITOR_L1: FieldKey = FieldKey::new(20);
    /// Primary colour channel.
    pub const COLOR_1: FieldKey = FieldKey::new(21);
    /// Secondary colour channel.
    pub const COLOR_2: FieldKey = FieldKey::new(22);
    /// Colour channel written by a colour trigger.
    pub const TARGET_COLOR: FieldKey = FieldKey::new(23);
    /// Z layer.
    pub const Z_LAYER: FieldKey = FieldKey::new(24);
    /// Z order within the layer.
    pub const Z_ORDER: FieldKey = FieldKey::new(25);
    /// Horizontal offset of a move trigger.
    pub const MOVE_X: FieldKey = FieldKey::new(28);
    /// Vertical offset of a move trigger.
    pub const MOVE_Y: FieldKey = FieldKey::new(29);
    /// Easing curve.
    pub const EASING: FieldKey = FieldKey::new(30);
    /// Text payload.
    pub const TEXT: FieldKey = FieldKey::new(31);
    /// Legacy uniform scale.
    pub const OLD_SCALE: FieldKey = FieldKey::new(32);
    /// Marks the object as its group's parent.
    pub const GROUP_PARENT: FieldKey = FieldKey::new(34);
    /// Target opacity.
    pub const OPACITY: FieldKey = FieldKey::new(35);
    /// Trigger can be interacted with.
    pub const INTERACTIBLE: FieldKey = FieldKey::new(36);
    /// HSV adjustment of the primary colour.
    pub const HSV_1: FieldKey = FieldKey::new(43);
    /// HSV adjustment of the secondary colour.
    pub const HSV_2: FieldKey = FieldKey::new(44);
    /// Target id (a group for most triggers, an item for item edits).
    pub const TARGET: FieldKey = FieldKey::new(51);
    /// Group activated or toggled by the trigger.
    pub const ACTIVATE_GROUP: FieldKey = FieldKey::new(56);
    /// Group membership.
    pub const GROUPS: FieldKey = FieldKey::new(57);
    /// Secondary editor layer.
    pub const EDITOR_L2: FieldKey = FieldKey::new(61);
    /// Trigger fires when spawned.
    pub const SPAWN_TRIGGER: FieldKey = FieldKey::new(62);
    /// Spawn delay in seconds.
    pub const SPAWN_DELAY: FieldKey = FieldKey::new(63);
    /// Rotation amount of a rotate trigger.
    pub const DEGREES: FieldKey = FieldKey::new(68);
    /// Secondary group (rotation centre, move target position).
    pub const CENTER_ID: FieldKey = FieldKey::new(71);
    /// Target count.
    pub const COUNT: FieldKey = FieldKey::new(77);
    /// Item or collision block id.
    pub const ITEM_ID: FieldKey = FieldKey::new(80);
    /// Easing rate.
    pub const EASE_RATE: FieldKey = FieldKey::new(85);
    /// Trigger can fire repeatedly.
    pub const MULTI_TRIGGER: FieldKey = FieldKey::new(87);
    /// Pickup mode.
    pub const PICKUP_MODE: FieldKey = FieldKey::new(88);
    /// Collision trigger fires on exit.
    pub const EXIT: FieldKey = FieldKey::new(93);
    /// Collision block participates in dynamic checks.
    pub const DYNAMIC: FieldKey = FieldKey::new(94);
    /// Second item or collision block id.
    pub const ITEM_ID_2: FieldKey = FieldKey::new(95);
    /// Linked group.
    pub const LINKED_GROUP: FieldKey = FieldKey::new(108);
    /// Trigger order.
    pub const ORDER: FieldKey = FieldKey::new(115);
    /// Horizontal scale.
    pub const SCALE_X: FieldKey = FieldKey::new(128);
    /// Vertical scale.
    pub const SCALE_Y: FieldKey = FieldKey::new(129);
    /// Candidate targets of an advanced random trigger.
    pub const RANDOM_TARGETS: FieldKey = FieldKey::new(152);
    /// Trigger channel.
    pub const CHANNEL: FieldKey = FieldKey::new(170);
    /// Parent group membership.
    pub const PARENT_GROUPS: FieldKey = FieldKey::new(274);
    /// Event ids listened for by an event trigger.
    pub const EVENTS: FieldKey = FieldKey::new(430);
    /// Steps of a sequence trigger.
    pub const SEQUENCE: FieldKey = FieldKey::new(435);
    /// Sequence mode.
    pub const SEQUENCE_MODE: FieldKey = FieldKey::new(436);
    /// Spawn remap table.
    pub const REMAPS: FieldKey = FieldKey::new(442);
    /// Control id addressing a single trigger.
    pub const CONTROL_ID: FieldKey = FieldKey::new(534);
    /// Spawn trigger resets its remap.
    pub const RESET_REMAP: FieldKey = FieldKey::new(581);
}

/// Entity type constants.
pub mod ids {
    use levelkit_foundation::EntityType;

    /// Default solid block.
    pub const BLOCK: EntityType = EntityType::of(1);
    /// Colour trigger.
    pub const COLOR: EntityType = EntityType::of(899);
    /// Move trigger.
    pub const MOVE: EntityType = EntityType::of(901);
    /// Text object.
    pub const TEXT: EntityType = EntityType::of(914);
    /// Alpha trigger.
    pub const ALPHA: EntityType = EntityType::of(1007);
    /// Toggle trigger.
    pub const TOGGLE: EntityType = EntityType::of(1049);
    /// Spawn trigger.
    pub const SPAWN: EntityType = EntityType::of(1268);
    /// Rotate trigger.
    pub const ROTATE: EntityType = EntityType::of(1346);
    /// Count trigger.
    pub const COUNT: EntityType = EntityType::of(1611);
    /// Collision trigger.
    pub const COLLISION: EntityType = EntityType::of(1815);
    /// Collision block.
    pub const COLLISION_BLOCK: EntityType = EntityType::of(1816);
    /// Pickup trigger.
    pub const PICKUP: EntityType = EntityType::of(1817);
    /// Advanced random trigger.
    pub const ADV_RANDOM: EntityType = EntityType::of(2068);
    /// Event trigger.
    pub const EVENT: EntityType = EntityType::of(3604);
    /// Sequence trigger.
    pub const SEQUENCE: EntityType = EntityType::of(3607);
    /// Item edit trigger.
    pub const ITEM_EDIT: EntityType = EntityType::of(3619);

    /// Types that carry the shared trigger fields.
    pub const TRIGGERS: [EntityType; 13] = [
        COLOR,
        MOVE,
        ALPHA,
        TOGGLE,
        SPAWN,
        ROTATE,
        COUNT,
        COLLISION,
        PICKUP,
        ADV_RANDOM,
        EVENT,
        SEQUENCE,
        ITEM_EDIT,
    ];
}

fn def(key: levelkit_foundation::FieldKey, name: &'static str, ty: FieldType) -> FieldDef {
    FieldDef { key, ty, name }
}

fn group_ref() -> FieldType {
    FieldType::Ref(Namespace::Group)
}

fn item_ref() -> FieldType {
    FieldType::Ref(Namespace::Item)
}

fn color_ref() -> FieldType {
    FieldType::Ref(Namespace::Color)
}

fn common() -> Vec<FieldDef> {
    use props::*;

    vec![
        def(ID, "id", FieldType::Int),
        def(X, "x", FieldType::Float),
        def(Y, "y", FieldType::Float),
        def(FLIP_X, "flip_x", FieldType::Bool),
        def(FLIP_Y, "flip_y", FieldType::Bool),
        def(ROTATION, "rotation", FieldType::Float),
        def(EDITOR_L1, "editor_l1", FieldType::Int),
        def(COLOR_1, "color_1", color_ref()),
        def(COLOR_2, "color_2", color_ref()),
        def(
            Z_LAYER,
            "z_layer",
            FieldType::int_literals([-5, -3, -1, 0, 1, 3, 5, 7, 9, 11]),
        ),
        def(Z_ORDER, "z_order", FieldType::Int),
        def(OLD_SCALE, "old_scale", FieldType::Float),
        def(GROUP_PARENT, "group_parent", FieldType::Bool),
        def(HSV_1, "hsv_1", FieldType::Str),
        def(HSV_2, "hsv_2", FieldType::Str),
        def(GROUPS, "groups", FieldType::GroupSet),
        def(EDITOR_L2, "editor_l2", FieldType::Int),
        def(LINKED_GROUP, "linked_group", FieldType::Int),
        def(SCALE_X, "scale_x", FieldType::Float),
        def(SCALE_Y, "scale_y", FieldType::Float),
        def(PARENT_GROUPS, "parent_groups", FieldType::GroupSet),
    ]
}

fn trigger_base() -> Vec<FieldDef> {
    use props::*;

    vec![
        def(TOUCH_TRIGGER, "touch_trigger", FieldType::Bool),
        def(EDITOR_PREVIEW, "editor_preview", FieldType::Bool),
        def(INTERACTIBLE, "interactible", FieldType::Bool),
        def(SPAWN_TRIGGER, "spawn_trigger", FieldType::Bool),
        def(MULTI_TRIGGER, "multi_trigger", FieldType::Bool),
        def(ORDER, "order", FieldType::Float),
        def(CHANNEL, "channel", FieldType::Int),
        def(CONTROL_ID, "control_id", FieldType::Ref(Namespace::Control)),
    ]
}

fn easing() -> FieldType {
    FieldType::int_literals(0..=18)
}

fn trigger(name: &'static str, ty: levelkit_foundation::EntityType) -> TypeSchema {
    TypeSchema::new(name, [ty])
}

/// Builds the built-in schema table.
#[must_use]
pub fn table() -> SchemaTable {
    use props::*;

    let base = trigger_base();

    SchemaTable::new(common())
        .with_type(
            trigger("color", ids::COLOR)
                .with_field(def(RED, "red", FieldType::Int))
                .with_field(def(GREEN, "green", FieldType::Int))
                .with_field(def(BLUE, "blue", FieldType::Int))
                .with_field(def(DURATION, "duration", FieldType::Float))
                .with_field(def(
                    TARGET_COLOR,
                    "target_color",
                    FieldType::Ref(Namespace::Color),
                ))
                .with_field(def(OPACITY, "opacity", FieldType::Float))
                .extend(&base),
        )
        .with_type(
            trigger("move", ids::MOVE)
                .with_field(def(DURATION, "duration", FieldType::Float))
                .with_field(def(MOVE_X, "move_x", FieldType::Int))
                .with_field(def(MOVE_Y, "move_y", FieldType::Int))
                .with_field(def(EASING, "easing", easing()))
                .with_field(def(TARGET, "target", group_ref()))
                .with_field(def(CENTER_ID, "target_pos", group_ref()))
                .with_field(def(EASE_RATE, "ease_rate", FieldType::Float))
                .extend(&base),
        )
        .with_type(
            trigger("alpha", ids::ALPHA)
                .with_field(def(DURATION, "duration", FieldType::Float))
                .with_field(def(OPACITY, "opacity", FieldType::Float))
                .with_field(def(TARGET, "target", group_ref()))
                .extend(&base),
        )
        .with_type(
            trigger("toggle", ids::TOGGLE)
                .with_field(def(TARGET, "target", group_ref()))
                .with_field(def(ACTIVATE_GROUP, "activate_group", FieldType::Bool))
                .extend(&base),
        )
        .with_type(
            trigger("spawn", ids::SPAWN)
                .with_field(def(TARGET, "target", group_ref()))
                .with_field(def(SPAWN_DELAY, "delay", FieldType::Float))
                .with_field(def(REMAPS, "remaps", FieldType::RemapTable))
                .with_field(def(RESET_REMAP, "reset_remap", FieldType::Bool))
                .extend(&base),
        )
        .with_type(
            trigger("rotate", ids::ROTATE)
                .with_field(def(DURATION, "duration", FieldType::Float))
                .with_field(def(EASING, "easing", easing()))
                .with_field(def(TARGET, "target", group_ref()))
                .with_field(def(DEGREES, "degrees", FieldType::Float))
                .with_field(def(CENTER_ID, "center", group_ref()))
                .extend(&base),
        )
        .with_type(
            trigger("count", ids::COUNT)
                .with_field(def(TARGET, "target", group_ref()))
                .with_field(def(ACTIVATE_GROUP, "activate_group", FieldType::Bool))
                .with_field(def(COUNT, "count", FieldType::Int))
                .with_field(def(ITEM_ID, "item", item_ref()))
                .extend(&base),
        )
        .with_type(
            trigger("pickup", ids::PICKUP)
                .with_field(def(COUNT, "count", FieldType::Int))
                .with_field(def(ITEM_ID, "item", item_ref()))
                .with_field(def(PICKUP_MODE, "mode", FieldType::int_literals(0..=2)))
                .extend(&base),
        )
        .with_type(
            trigger("collision", ids::COLLISION)
                .with_field(def(TARGET, "target", group_ref()))
                .with_field(def(ACTIVATE_GROUP, "activate_group", FieldType::Bool))
                .with_field(def(
                    ITEM_ID,
                    "block_a",
                    FieldType::Ref(Namespace::Collision),
                ))
                .with_field(def(EXIT, "exit", FieldType::Bool))
                .with_field(def(
                    ITEM_ID_2,
                    "block_b",
                    FieldType::Ref(Namespace::Collision),
                ))
                .extend(&base),
        )
        .with_type(
            trigger("collision_block", ids::COLLISION_BLOCK)
                .with_field(def(
                    ITEM_ID,
                    "block_id",
                    FieldType::Ref(Namespace::Collision),
                ))
                .with_field(def(DYNAMIC, "dynamic", FieldType::Bool)),
        )
        .with_type(
            trigger("event", ids::EVENT)
                .with_field(def(TARGET, "spawn_id", group_ref()))
                .with_field(def(EVENTS, "events", FieldType::EventSet))
                .extend(&base),
        )
        .with_type(
            trigger("sequence", ids::SEQUENCE)
                .with_field(def(SEQUENCE, "sequence", FieldType::Sequence))
                .with_field(def(
                    SEQUENCE_MODE,
                    "mode",
                    FieldType::int_literals(0..=2),
                ))
                .extend(&base),
        )
        .with_type(
            trigger("adv_random", ids::ADV_RANDOM)
                .with_field(def(ACTIVATE_GROUP, "m_56", FieldType::Any))
                .with_field(def(RANDOM_TARGETS, "targets", FieldType::Sequence))
                .extend(&base),
        )
        .with_type(
            trigger("item_edit", ids::ITEM_EDIT)
                .with_field(def(TARGET, "target_item", item_ref()))
                .with_field(def(ITEM_ID, "item_1", item_ref()))
                .with_field(def(ITEM_ID_2, "item_2", item_ref()))
                .extend(&base),
        )
        .with_type(TypeSchema::new("text", [ids::TEXT]).with_field(def(
            TEXT,
            "text",
            FieldType::union([FieldType::Str, FieldType::Int]),
        )))
}
