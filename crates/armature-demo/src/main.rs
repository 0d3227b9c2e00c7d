//! Armature demo entry point
//!
//! Builds a small figure (torso, upper arm, forearm, hand), poses the arm with
//! holds, grabs and stretches, bakes it and prints a JSON summary of the
//! render objects.

use std::path::PathBuf;

use armature_core::{Armature, ArmatureError, BakeOptions, BakedGeometry, Project, RenderObject};
use clap::Parser;
use glam::{Quat, Vec3};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "armature-demo", version, about = "Pose and bake an example armature")]
struct Args {
    /// Do not emit bone render objects
    #[arg(long)]
    no_bones: bool,

    /// Raise the arm by this many degrees (rotation about the shoulder)
    #[arg(long, default_value_t = 60.0)]
    angle: f32,

    /// Stretch the forearm by this factor towards the raised direction
    #[arg(long, default_value_t = 1.0)]
    stretch: f32,

    /// Save the posed project (RON) to this path
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Summary {
    name: String,
    nodes: usize,
    geometry: Vec<ObjectSummary>,
    bones: Vec<ObjectSummary>,
}

#[derive(Debug, Serialize)]
struct ObjectSummary {
    origin: [f32; 3],
    vertices: usize,
    triangles: usize,
    shadeless: bool,
}

impl From<&RenderObject> for ObjectSummary {
    fn from(object: &RenderObject) -> Self {
        Self {
            origin: object.transform.transform_point3(Vec3::ZERO).to_array(),
            vertices: object.geometry.vertices.len(),
            triangles: object.geometry.triangle_count(),
            shadeless: object.shadeless,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "armature_demo=info,armature_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    tracing::info!("Building figure");

    let mut armature = build_figure()?;
    pose_arm(&mut armature, args.angle.to_radians(), args.stretch)?;

    let options = BakeOptions {
        make_bones: !args.no_bones,
        ..BakeOptions::default()
    };
    let bake = armature.bake(&options)?;
    tracing::info!(
        geometry = bake.geometry.len(),
        bones = bake.bones.len(),
        "Baked figure"
    );

    let summary = Summary {
        name: armature.name.clone(),
        nodes: armature.node_count(),
        geometry: bake.geometry.iter().map(ObjectSummary::from).collect(),
        bones: bake.bones.iter().map(ObjectSummary::from).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = args.save {
        let mut project = Project::with_armature("figure", armature);
        project.bake_options = options;
        project.save(&path)?;
    }

    Ok(())
}

/// Placeholder geometry: a flat quad of the given half size in the XY plane
fn quad(half: Vec3, color: [f32; 4]) -> BakedGeometry {
    let vertices = vec![
        [-half.x, -half.y, 0.0],
        [half.x, -half.y, 0.0],
        [half.x, half.y, 0.0],
        [-half.x, half.y, 0.0],
    ];
    let normals = vec![[0.0, 0.0, 1.0]; 4];
    BakedGeometry::new(vertices, normals, vec![0, 1, 2, 0, 2, 3]).with_color(color)
}

fn build_figure() -> Result<Armature, ArmatureError> {
    let mut armature = Armature::new("figure");

    let torso = armature.add_node("torso");
    let shoulder = armature.create_point(torso, "shoulder", Vec3::new(0.3, 0.5, 0.0))?;
    let center = armature.create_point(torso, "center", Vec3::ZERO)?;
    armature.attach(center, quad(Vec3::new(0.3, 0.5, 0.0), [0.2, 0.4, 0.8, 1.0]))?;

    // Limbs hang along -Y from their top point
    let mut parent_point = shoulder;
    for (name, length) in [("upper_arm", 0.35), ("forearm", 0.3), ("hand", 0.1)] {
        let limb = armature.add_node(name);
        let top = armature.create_point(limb, "top", Vec3::ZERO)?;
        let end = armature.create_point(limb, "end", Vec3::new(0.0, -length, 0.0))?;
        let middle = armature.create_point(limb, "middle", Vec3::new(0.0, -length / 2.0, 0.0))?;
        armature.stick_to(top, parent_point)?;
        armature.attach(middle, quad(Vec3::new(0.04, length / 2.0, 0.0), [0.9, 0.7, 0.6, 1.0]))?;
        parent_point = end;
    }

    Ok(armature)
}

fn pose_arm(armature: &mut Armature, angle: f32, stretch: f32) -> Result<(), ArmatureError> {
    let torso = armature.id_by_name("torso")?;
    let upper_arm = armature.id_by_name("upper_arm")?;
    let forearm = armature.id_by_name("forearm")?;

    // Swing the upper arm out sideways about the shoulder
    let shoulder = armature.global_position(torso, armature.point(torso, "shoulder")?.position)?;
    let elbow = armature.point(upper_arm, "end")?;
    let elbow_world = armature.global_position(upper_arm, elbow.position)?;
    let raised = shoulder + Quat::from_rotation_z(angle) * (elbow_world - shoulder);

    armature.grab(upper_arm, elbow)?;
    armature.point_at(upper_arm, raised)?;
    armature.release(upper_arm)?;

    // Bend the forearm about a hinge through the elbow, then stretch it
    let wrist = armature.point(forearm, "end")?;
    let hinge = armature.global_position(forearm, Vec3::new(0.0, 0.0, 1.0))?;
    armature.hold(forearm, hinge)?;
    armature.grab(forearm, wrist)?;

    let elbow_world = armature.global_position(forearm, Vec3::ZERO)?;
    let wrist_world = armature.global_position(forearm, wrist.position)?;
    let bent = Quat::from_rotation_z(angle / 2.0) * (wrist_world - elbow_world);
    armature.stretch_to(forearm, elbow_world + bent * stretch)?;
    armature.release(forearm)?;

    Ok(())
}
