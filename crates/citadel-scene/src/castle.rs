//! The castle: a fixed shape list, three materials and parametric placement.
//!
//! Build order is deterministic, so object constant slots are stable between
//! runs for the same [`CastleLayout`].

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::{Vec3, Vec4};

use crate::error::SceneError;
use crate::geometry::GeometryBatch;
use crate::item::Transform;
use crate::material::{MaterialId, MaterialTable};
use crate::meshgen::{
    create_box, create_cone, create_cylinder, create_diamond, create_grid, create_pyramid,
    create_sphere, create_torus, create_triangular_prism, create_wedge,
};
use crate::scene::Scene;
use crate::vertex::MeshData;

/// Placement parameters. The defaults reproduce the reference castle.
#[derive(Debug, Clone, PartialEq)]
pub struct CastleLayout {
    /// Plot extent along X.
    pub width: f32,
    /// Plot extent along Z.
    pub depth: f32,
    /// Towers spread evenly around the plot, starting on the (+x, +z)
    /// diagonal; every tower but the last gets a roof.
    pub tower_count: u32,
    /// Sides of the plot that receive a full-height wall (the rest stay open).
    pub long_walls: u32,
    /// Length covered by merlons along each side.
    pub merlon_span: u32,
    pub merlon_step: usize,
    /// Material applied to every item.
    pub material: String,
}

impl Default for CastleLayout {
    fn default() -> Self {
        Self {
            width: 50.0,
            depth: 50.0,
            tower_count: 4,
            long_walls: 3,
            merlon_span: 50,
            merlon_step: 2,
            material: "stone0".to_owned(),
        }
    }
}

/// Shapes in batch order.
pub fn castle_meshes(layout: &CastleLayout) -> Vec<(&'static str, MeshData)> {
    vec![
        ("box", create_box(1.0, 1.0, 1.0, 3)),
        ("grid", create_grid(layout.width, layout.depth, 60, 40)),
        ("sphere", create_sphere(0.5, 20, 20)),
        ("cylinder", create_cylinder(0.5, 0.5, 2.0, 20, 20)),
        ("cone", create_cone(0.5, 1.0, 20, 1)),
        ("prism", create_triangular_prism(1.0, 1.0, 1.0)),
        ("diamond", create_diamond(1.0, 0.7, 0.3, 1.0, 6)),
        ("pyramid", create_pyramid(1.0, 1.0, 1.0)),
        ("torus", create_torus(0.3, 2.0, 20, 20)),
        ("wedge", create_wedge(1.0, 1.0, 2.0)),
        ("torus2", create_torus(0.3, 2.0, 20, 20)),
        ("cylinder2", create_cylinder(1.0, 0.5, 2.0, 20, 20)),
    ]
}

/// `bricks0`, `stone0` and `tile0`, bound to texture slots 0, 1 and 2.
pub fn castle_materials() -> Result<MaterialTable, SceneError> {
    let mut table = MaterialTable::new();
    table.define("bricks0", Vec4::ONE, Vec3::splat(0.02), 0.1, 0)?;
    table.define("stone0", Vec4::ONE, Vec3::splat(0.95), 0.01, 1)?;
    table.define("tile0", Vec4::ONE, Vec3::splat(0.02), 0.3, 2)?;
    Ok(table)
}

impl Scene {
    /// Builds geometry, materials and every castle item.
    pub fn castle(layout: &CastleLayout) -> Result<Self, SceneError> {
        let batch = GeometryBatch::build(castle_meshes(layout))?;
        let materials = castle_materials()?;
        let material = materials.lookup(&layout.material)?;

        let mut scene = Scene::new(batch, materials);
        CastleBuilder {
            scene: &mut scene,
            material,
        }
        .build(layout)?;

        log::info!(
            "castle built: {} items over {} shapes",
            scene.items.len(),
            scene.batch.shape_count()
        );
        Ok(scene)
    }
}

struct CastleBuilder<'a> {
    scene: &'a mut Scene,
    material: MaterialId,
}

impl CastleBuilder<'_> {
    fn place(&mut self, shape: &str, transform: Transform) -> Result<(), SceneError> {
        let Scene { batch, items, .. } = &mut *self.scene;
        items.add(batch, shape, self.material, transform)?;
        Ok(())
    }

    fn build(mut self, layout: &CastleLayout) -> Result<(), SceneError> {
        let w2 = 0.5 * layout.width;
        let d2 = 0.5 * layout.depth;

        self.place("grid", Transform::new())?;
        self.towers(layout, w2, d2)?;
        self.walls(layout, w2, d2)?;
        self.courtyard(w2, d2)?;
        Ok(())
    }

    fn towers(&mut self, layout: &CastleLayout, w2: f32, d2: f32) -> Result<(), SceneError> {
        let radius = (w2 * w2 + d2 * d2).sqrt();
        let step = TAU / layout.tower_count.max(1) as f32;

        for i in 0..layout.tower_count {
            let theta = i as f32 * step + FRAC_PI_4;
            let c = radius * theta.cos();
            let s = radius * theta.sin();

            self.place("cylinder", Transform::new().scale(6.0, 7.0, 6.0).translate(c, 7.0, s))?;
            self.place("cylinder", Transform::new().scale(0.2, 2.0, 0.2).translate(c, 21.0, s))?;
            self.place("sphere", Transform::new().uniform_scale(0.3).translate(c, 23.1, s))?;
            self.place("box", Transform::new().scale(1.5, 1.0, 0.1).translate(c - 1.0, 22.5, s))?;

            if i + 1 < layout.tower_count {
                self.place("cone", Transform::new().scale(8.0, 6.0, 8.0).translate(c, 17.0, s))?;
            }
        }

        // Pale and collar on the (+x, -z) corner.
        self.place(
            "cylinder2",
            Transform::new().scale(3.5, 3.0, 3.5).translate(w2, 17.5, -d2),
        )?;
        self.place(
            "torus2",
            Transform::new().scale(1.8, 2.0, 1.8).translate(w2, 14.5, -d2),
        )?;
        Ok(())
    }

    fn walls(&mut self, layout: &CastleLayout, w2: f32, d2: f32) -> Result<(), SceneError> {
        let half_span = 0.5 * layout.merlon_span as f32;

        for i in 0..4u32 {
            let theta = i as f32 * FRAC_PI_2;
            let c = w2 * theta.cos();
            let s = w2 * theta.sin();

            if i < layout.long_walls {
                self.place(
                    "box",
                    Transform::new()
                        .scale(1.0, 10.0, layout.width)
                        .rotate_y(theta)
                        .translate(c, 5.0, s),
                )?;
            }

            // Unit prism scaled to the wall: the crown is exactly as thick.
            self.place(
                "prism",
                Transform::new()
                    .scale(1.0, 4.0, layout.width - 3.0)
                    .rotate_y(theta)
                    .translate(c, 10.5, s),
            )?;

            for j in (0..layout.merlon_span).step_by(layout.merlon_step.max(1)) {
                let offset = j as f32 - half_span;
                let (x, z) = if i % 2 == 0 { (c, s + offset) } else { (c + offset, s) };
                self.place(
                    "box",
                    Transform::new()
                        .scale(2.0, 1.0, 1.0)
                        .rotate_y(theta)
                        .translate(x, 12.8, z),
                )?;
            }
        }

        // Front wall halves either side of the gate.
        for i in 0..2 {
            self.place(
                "box",
                Transform::new()
                    .scale(w2 - 6.0, 10.0, 1.0)
                    .translate(-0.5 * w2 + i as f32 * w2, 5.0, -d2),
            )?;
        }
        Ok(())
    }

    fn courtyard(&mut self, w2: f32, d2: f32) -> Result<(), SceneError> {
        let keep_z = 0.52 * w2;

        self.place("pyramid", Transform::new().scale(21.0, 6.0, 21.0).translate(0.0, 7.5, keep_z))?;
        self.place("diamond", Transform::new().translate(0.0, 13.0, keep_z))?;
        self.place(
            "torus",
            Transform::new()
                .uniform_scale(0.5)
                .rotate_x(1.571)
                .translate(0.0, 11.75, keep_z),
        )?;

        // Ramps rotate before scaling so the long axis ends up along Z.
        for i in 0..2 {
            let i = i as f32;
            self.place(
                "wedge",
                Transform::new()
                    .rotate_y(-FRAC_PI_2)
                    .scale(3.0, 3.0, 18.0)
                    .translate(0.0, 4.5 - 3.0 * i, -3.5 - 31.0 * i),
            )?;
        }

        self.place("box", Transform::new().scale(6.0, 3.0, 13.0).translate(0.0, 1.5, -d2 + 6.0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;

    #[test]
    fn default_castle_has_the_reference_item_count() {
        let scene = Scene::castle(&CastleLayout::default()).unwrap();
        assert_eq!(scene.items.len(), 137);
        assert_eq!(scene.batch.shape_count(), 12);
        assert_eq!(scene.materials.len(), 3);
    }

    #[test]
    fn slots_follow_build_order() {
        let scene = Scene::castle(&CastleLayout::default()).unwrap();
        for (i, item) in scene.items.iter().enumerate() {
            assert_eq!(item.obj_cb_index() as usize, i);
        }
        assert_eq!(scene.items.get(0).unwrap().shape, "grid");
        assert_eq!(scene.items.get(136).unwrap().shape, "box");
    }

    #[test]
    fn every_item_uses_the_layout_material() {
        let scene = Scene::castle(&CastleLayout::default()).unwrap();
        let stone = scene.materials.lookup("stone0").unwrap();
        assert!(scene.items.iter().all(|item| item.material == stone));
    }

    #[test]
    fn first_tower_sits_on_the_diagonal() {
        let scene = Scene::castle(&CastleLayout::default()).unwrap();
        let tower = scene.items.get(1).unwrap();
        let expected = Mat4::from_translation(Vec3::new(25.0, 7.0, 25.0))
            * Mat4::from_scale(Vec3::new(6.0, 7.0, 6.0));
        assert!(tower.world.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn building_is_deterministic() {
        let a = Scene::castle(&CastleLayout::default()).unwrap();
        let b = Scene::castle(&CastleLayout::default()).unwrap();
        assert!(a.items.iter().zip(b.items.iter()).all(|(x, y)| x == y));
    }

    #[test]
    fn unknown_material_fails_fast() {
        let layout = CastleLayout {
            material: "marble".into(),
            ..CastleLayout::default()
        };
        assert!(matches!(
            Scene::castle(&layout),
            Err(SceneError::Material(_))
        ));
    }

    #[test]
    fn towers_spread_evenly_for_any_count() {
        let layout = CastleLayout {
            tower_count: 8,
            ..CastleLayout::default()
        };
        let scene = Scene::castle(&layout).unwrap();

        // Tower bodies are the tall cylinders.
        let bases: Vec<Vec3> = scene
            .items
            .iter()
            .filter(|item| item.shape == "cylinder" && item.world.y_axis.length() > 6.0)
            .map(|item| item.world.w_axis.truncate())
            .collect();
        assert_eq!(bases.len(), 8);

        let radius = bases[0].length();
        for (i, a) in bases.iter().enumerate() {
            assert!((a.length() - radius).abs() < 1e-3);
            for b in &bases[i + 1..] {
                assert!(a.distance(*b) > 1.0, "towers overlap at {a} and {b}");
            }
        }
    }

    #[test]
    fn default_towers_keep_the_quarter_turn_step() {
        let scene = Scene::castle(&CastleLayout::default()).unwrap();
        // Grid, then five parts for the first tower.
        let second = scene.items.get(6).unwrap();
        assert_eq!(second.shape, "cylinder");
        assert!(second
            .world
            .w_axis
            .truncate()
            .abs_diff_eq(Vec3::new(-25.0, 7.0, 25.0), 1e-3));
    }

    #[test]
    fn wall_crowns_match_the_wall_thickness() {
        let layout = CastleLayout::default();
        let scene = Scene::castle(&layout).unwrap();
        let meshes = castle_meshes(&layout);
        let extent_x = |name: &str| {
            let (_, mesh) = meshes.iter().find(|(n, _)| *n == name).unwrap();
            let xs = mesh.vertices.iter().map(|v| v.position[0]);
            let (lo, hi) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
            hi - lo
        };

        let crowns: Vec<_> = scene.items.iter().filter(|item| item.shape == "prism").collect();
        assert_eq!(crowns.len(), 4);

        let wall = scene
            .items
            .iter()
            .find(|item| item.shape == "box" && item.world.y_axis.length() > 9.0)
            .unwrap();
        let wall_thickness = wall.world.x_axis.length() * extent_x("box");
        for crown in crowns {
            let thickness = crown.world.x_axis.length() * extent_x("prism");
            assert!((thickness - wall_thickness).abs() < 1e-4);
        }
    }

    #[test]
    fn fewer_towers_drop_their_parts() {
        let layout = CastleLayout {
            tower_count: 1,
            ..CastleLayout::default()
        };
        let scene = Scene::castle(&layout).unwrap();
        // One tower without a roof: 4 parts instead of 19.
        assert_eq!(scene.items.len(), 137 - 15);
    }
}
