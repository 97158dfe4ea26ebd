//! Gear-train solver.
//!
//! One driver gear turns on its own; every driven gear meshes against the
//! driver and derives radius, placement and rotation from it. Tooth counts
//! are chosen up front and radii follow from them, so the pitch
//! (radius / teeth) is identical across the train.

use std::f64::consts::PI;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Visual weight of a gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Large,
    Medium,
    Small,
}

/// Spoke and bolt counts for a size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fittings {
    pub spokes: u32,
    pub bolts: u32,
}

impl SizeClass {
    pub const fn fittings(self) -> Fittings {
        match self {
            SizeClass::Large => Fittings { spokes: 6, bolts: 6 },
            SizeClass::Medium => Fittings { spokes: 5, bolts: 5 },
            SizeClass::Small => Fittings { spokes: 4, bolts: 3 },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSpec {
    pub radius: f64,
    pub teeth: NonZeroU32,
    /// Radians per frame.
    pub speed: f64,
    /// Center as a fraction of the viewport size.
    #[serde(default = "default_anchor")]
    pub anchor: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolts: Option<u32>,
}

fn default_anchor() -> [f64; 2] {
    [0.5, 0.5]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrivenSpec {
    pub teeth: NonZeroU32,
    /// Placement angle around the driver, degrees.
    pub angle_deg: f64,
    pub size: SizeClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolts: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mesh {
    Driver,
    /// Meshed against the driver at `placement` radians.
    Driven { placement: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gear {
    pub center: Point,
    pub radius: f64,
    pub teeth: NonZeroU32,
    pub bolts: u32,
    pub spokes: u32,
    pub size: SizeClass,
    /// Current rotation, radians.
    pub rotation: f64,
    /// Angular speed, radians per frame. For driven gears this is implied by
    /// the mesh, not integrated.
    pub speed: f64,
    pub mesh: Mesh,
}

impl Gear {
    pub fn pitch(&self) -> f64 {
        self.radius / self.teeth.get() as f64
    }
}

/// Rotation of a driven gear as a closed-form function of the driver angle.
///
/// The half-tooth phase term puts a gap of the driven gear opposite a tooth
/// of the driver at the contact point.
pub fn driven_rotation(
    driver_rotation: f64,
    placement: f64,
    driver_teeth: NonZeroU32,
    driven_teeth: NonZeroU32,
) -> f64 {
    let ratio = driver_teeth.get() as f64 / driven_teeth.get() as f64;
    (placement + PI) - (driver_rotation - placement) * ratio + PI / driven_teeth.get() as f64
}

/// A driver plus its driven gears. `gears[0]` is always the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct GearTrain {
    gears: Vec<Gear>,
    mesh_factor: f64,
}

impl GearTrain {
    /// Position every gear of the train around `center`.
    ///
    /// Inputs are expected to be validated: positive radius, mesh factor in
    /// `(0, 1)`. Tooth counts cannot be zero by construction.
    pub fn solve(
        driver: &DriverSpec,
        center: Point,
        driven: &[DrivenSpec],
        mesh_factor: f64,
    ) -> Self {
        let large = SizeClass::Large.fittings();
        let mut gears = Vec::with_capacity(driven.len() + 1);
        gears.push(Gear {
            center,
            radius: driver.radius,
            teeth: driver.teeth,
            bolts: driver.bolts.unwrap_or(large.bolts),
            spokes: large.spokes,
            size: SizeClass::Large,
            rotation: 0.0,
            speed: driver.speed,
            mesh: Mesh::Driver,
        });

        let driver_teeth = driver.teeth.get() as f64;
        for spec in driven {
            let teeth = spec.teeth.get() as f64;
            let radius = driver.radius * (teeth / driver_teeth);
            let placement = spec.angle_deg.to_radians();
            let fittings = spec.size.fittings();
            gears.push(Gear {
                center: center.offset(Point::polar(
                    placement,
                    (driver.radius + radius) * mesh_factor,
                )),
                radius,
                teeth: spec.teeth,
                bolts: spec.bolts.unwrap_or(fittings.bolts),
                spokes: fittings.spokes,
                size: spec.size,
                rotation: driven_rotation(0.0, placement, driver.teeth, spec.teeth),
                speed: -driver.speed * (driver_teeth / teeth),
                mesh: Mesh::Driven { placement },
            });
        }

        GearTrain { gears, mesh_factor }
    }

    pub fn gears(&self) -> &[Gear] {
        &self.gears
    }

    pub fn driver(&self) -> &Gear {
        &self.gears[0]
    }

    /// Integrate the driver one frame and re-derive every driven rotation.
    pub fn advance(&mut self) {
        let driver = &mut self.gears[0];
        driver.rotation += driver.speed;
        self.sync();
    }

    /// Bind every driven gear to the current driver angle.
    fn sync(&mut self) {
        let (head, rest) = self.gears.split_at_mut(1);
        let driver = &head[0];
        for gear in rest {
            if let Mesh::Driven { placement } = gear.mesh {
                gear.rotation =
                    driven_rotation(driver.rotation, placement, driver.teeth, gear.teeth);
            }
        }
    }

    /// Move the train to a new driver center. Radii, tooth counts and
    /// rotations are unchanged.
    pub fn recenter(&mut self, center: Point) {
        let mesh_factor = self.mesh_factor;
        let (head, rest) = self.gears.split_at_mut(1);
        let driver = &mut head[0];
        driver.center = center;
        for gear in rest {
            if let Mesh::Driven { placement } = gear.mesh {
                gear.center = center.offset(Point::polar(
                    placement,
                    (driver.radius + gear.radius) * mesh_factor,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn driver() -> DriverSpec {
        DriverSpec {
            radius: 100.0,
            teeth: nz(18),
            speed: 0.02,
            anchor: default_anchor(),
            bolts: None,
        }
    }

    fn driven(teeth: u32, angle_deg: f64, size: SizeClass) -> DrivenSpec {
        DrivenSpec {
            teeth: nz(teeth),
            angle_deg,
            size,
            bolts: None,
        }
    }

    fn train() -> GearTrain {
        GearTrain::solve(
            &driver(),
            Point::new(500.0, 300.0),
            &[
                driven(12, 225.0, SizeClass::Medium),
                driven(8, 330.0, SizeClass::Small),
            ],
            0.97,
        )
    }

    #[test]
    fn pitch_is_constant_across_the_train() {
        let t = train();
        let pitch = t.driver().pitch();
        for gear in t.gears() {
            assert!((gear.pitch() - pitch).abs() < 1e-9);
        }
    }

    #[test]
    fn driven_gears_counter_rotate_with_inverse_ratio() {
        let t = train();
        let d = t.driver();
        for gear in &t.gears()[1..] {
            assert!(gear.speed.signum() != d.speed.signum());
            let lhs = gear.speed.abs() * gear.teeth.get() as f64;
            let rhs = d.speed.abs() * d.teeth.get() as f64;
            assert!((lhs - rhs).abs() < 1e-9);
        }
    }

    #[test]
    fn driven_center_sits_on_placement_ray() {
        let t = train();
        let g = &t.gears()[1];
        let rel = g.center.minus(t.driver().center);
        assert!((rel.length() - (100.0 + g.radius) * 0.97).abs() < 1e-9);
        assert!((rel.angle() - 225f64.to_radians() + 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn advancing_matches_implied_speed() {
        let mut t = train();
        let before: Vec<f64> = t.gears().iter().map(|g| g.rotation).collect();
        t.advance();
        for (gear, prev) in t.gears().iter().zip(before) {
            assert!((gear.rotation - prev - gear.speed).abs() < 1e-9);
        }
    }

    #[test]
    fn rotation_is_a_pure_function_of_driver_angle() {
        let mut stepped = train();
        for _ in 0..250 {
            stepped.advance();
        }
        let angle = stepped.driver().rotation;
        let g = &stepped.gears()[2];
        let Mesh::Driven { placement } = g.mesh else {
            panic!("expected driven gear");
        };
        let direct = driven_rotation(angle, placement, nz(18), g.teeth);
        assert!((g.rotation - direct).abs() < 1e-9);
    }

    #[test]
    fn recenter_keeps_radii_and_rotation() {
        let mut t = train();
        t.advance();
        let before = t.clone();
        t.recenter(Point::new(100.0, 80.0));
        for (a, b) in t.gears().iter().zip(before.gears()) {
            assert_eq!(a.radius, b.radius);
            assert_eq!(a.rotation, b.rotation);
        }
        let rel = t.gears()[1].center.minus(Point::new(100.0, 80.0));
        let rel_before = before.gears()[1].center.minus(before.driver().center);
        assert!((rel.x - rel_before.x).abs() < 1e-9);
        assert!((rel.y - rel_before.y).abs() < 1e-9);
    }

    #[test]
    fn size_class_fittings() {
        assert_eq!(SizeClass::Large.fittings().spokes, 6);
        assert_eq!(SizeClass::Medium.fittings().spokes, 5);
        assert_eq!(SizeClass::Small.fittings().spokes, 4);
    }
}
