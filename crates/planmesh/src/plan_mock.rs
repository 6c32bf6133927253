//! Procedural stand-in building: a U-shaped contour with corridor walls and room slabs.
//! Drawn when no model file is used.

use crate::buffer::GeometryBuffer;
use crate::primitives::add_box;

const CONTOUR_COLOR: [f32; 3] = [0.5, 0.5, 0.5];
const WALL_COLOR: [f32; 3] = [0.05, 0.05, 0.05];
const ROOM_COLOR: [f32; 3] = [0.7, 0.75, 0.8];

const CONTOUR_HEIGHT: f32 = 0.3;
const WALL_THICKNESS: f32 = 0.15;
const WALL_HEIGHT: f32 = 2.0;
const ROOM_HEIGHT: f32 = 0.1;

const CROSS_WALLS: usize = 8;
const WING_WALLS: usize = 6;

/// The three layers of the mock, each drawn as its own mesh.
#[derive(Debug, Clone, Default)]
pub struct PlanMock {
    pub contour: GeometryBuffer,
    pub walls: GeometryBuffer,
    pub rooms: GeometryBuffer,
}

/// Builds the mock for a square plan of side `plan_size`.
pub fn build_plan_mock(plan_size: f32) -> PlanMock {
    let mut mock = PlanMock::default();

    let bottom_width = plan_size * 0.90;
    let bottom_depth = plan_size * 0.20;
    let bottom_z = -plan_size * 0.20;
    let slab_y = CONTOUR_HEIGHT / 2.0;

    // Contour: long bottom block, two end blocks, two wings.
    add_box(
        &mut mock.contour,
        [0.0, slab_y, bottom_z],
        [bottom_width, CONTOUR_HEIGHT, bottom_depth],
        CONTOUR_COLOR,
    );

    let (left_w, left_d) = (plan_size * 0.32, plan_size * 0.24);
    add_box(
        &mut mock.contour,
        [
            -bottom_width / 2.0 + left_w / 2.0,
            slab_y,
            bottom_z + (bottom_depth - left_d) / 2.0,
        ],
        [left_w, CONTOUR_HEIGHT, left_d],
        CONTOUR_COLOR,
    );

    let (right_w, right_d) = (plan_size * 0.30, plan_size * 0.26);
    add_box(
        &mut mock.contour,
        [
            bottom_width / 2.0 - right_w / 2.0,
            slab_y,
            bottom_z + (bottom_depth - right_d) / 2.0,
        ],
        [right_w, CONTOUR_HEIGHT, right_d],
        CONTOUR_COLOR,
    );

    let wing_width = plan_size * 0.20;
    let wing_depth = plan_size * 0.70;
    let wings_z = bottom_z + bottom_depth / 2.0 + wing_depth / 2.0;
    let wings_x = plan_size * 0.32;

    for x in [-wings_x, wings_x] {
        add_box(
            &mut mock.contour,
            [x, slab_y, wings_z],
            [wing_width, CONTOUR_HEIGHT, wing_depth],
            CONTOUR_COLOR,
        );
    }

    // Walls.
    let mut wall = |x: f32, z: f32, along_z: bool, length: f32| {
        let size = if along_z {
            [WALL_THICKNESS, WALL_HEIGHT, length]
        } else {
            [length, WALL_HEIGHT, WALL_THICKNESS]
        };
        add_box(&mut mock.walls, [x, WALL_HEIGHT / 2.0, z], size, WALL_COLOR);
    };

    wall(0.0, bottom_z, false, bottom_width * 0.85);
    wall(-wings_x, wings_z, true, wing_depth * 0.8);
    wall(wings_x, wings_z, true, wing_depth * 0.8);

    let cross_spacing = bottom_width / (CROSS_WALLS + 1) as f32;
    for i in 0..CROSS_WALLS {
        let x = -bottom_width / 2.0 + cross_spacing * (i + 1) as f32;
        wall(x, bottom_z, true, bottom_depth * 0.6);
    }

    let wing_spacing = wing_depth / (WING_WALLS + 1) as f32;
    for i in 0..WING_WALLS {
        let z = bottom_z + bottom_depth / 2.0 + wing_spacing * (i + 1) as f32;
        wall(-wings_x, z, false, wing_width * 0.7);
        wall(wings_x, z, false, wing_width * 0.7);
    }

    // Rooms sit on top of the contour slab.
    let room_y = CONTOUR_HEIGHT + ROOM_HEIGHT / 2.0;
    let mut room = |x: f32, z: f32, w: f32, d: f32| {
        add_box(&mut mock.rooms, [x, room_y, z], [w, ROOM_HEIGHT, d], ROOM_COLOR);
    };

    let room_w = cross_spacing * 0.85;
    let room_d = bottom_depth * 0.35;
    for i in 0..=CROSS_WALLS {
        let x = -bottom_width / 2.0 + cross_spacing * (i as f32 + 0.5);
        room(x, bottom_z - bottom_depth * 0.25, room_w, room_d);
        room(x, bottom_z + bottom_depth * 0.25, room_w, room_d);
    }

    let wing_room_w = wing_width * 0.35;
    let wing_room_d = wing_spacing * 0.85;
    for wing_x in [-wings_x, wings_x] {
        for i in 0..=WING_WALLS {
            let z = bottom_z + bottom_depth / 2.0 + wing_spacing * (i as f32 + 0.5);
            room(wing_x - wing_width * 0.25, z, wing_room_w, wing_room_d);
            room(wing_x + wing_width * 0.25, z, wing_room_w, wing_room_d);
        }
    }

    mock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_layers_have_expected_box_counts() {
        let mock = build_plan_mock(220.0);
        assert_eq!(mock.contour.vertex_count(), 5 * 36);
        assert_eq!(mock.walls.vertex_count(), (3 + CROSS_WALLS + 2 * WING_WALLS) * 36);
        assert_eq!(
            mock.rooms.vertex_count(),
            (2 * (CROSS_WALLS + 1) + 4 * (WING_WALLS + 1)) * 36
        );
        assert!(mock.contour.is_consistent() && mock.walls.is_consistent() && mock.rooms.is_consistent());
    }

    #[test]
    fn mock_stays_within_plan_width_and_above_ground() {
        let size = 220.0;
        let mock = build_plan_mock(size);
        for layer in [&mock.contour, &mock.walls, &mock.rooms] {
            for i in 0..layer.vertex_count() {
                let p = layer.position(i).unwrap();
                assert!(p[0].abs() <= size / 2.0 + 1e-3);
                assert!(p[1] >= -1e-6);
            }
        }
    }
}
