//! Headless driver for the gallery3d demos.
//! Picks a demo from the CLI and logs what the compute side produces.

use anyhow::{Context, Result};

use mathcore::{Axis, CameraInput, Transform, TransformList, TransformOp, format_matrix};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Demo {
    Transforms,
    Maze,
    Fractal,
    Arm,
}

struct Options {
    demo: Demo,
    seed: u64,
    size: usize,
    iters: u32,
    perspective: f64,
    angle: f64,
    spin_axis: Option<Axis>,
    out: Option<String>,
    input: Option<String>,
    obj: Option<String>,
}

fn parse_options() -> Result<Options> {
    // Accept: --demo=transforms|maze|fractal|arm plus per-demo knobs.
    let mut opts = Options {
        demo: Demo::Transforms,
        seed: 1,
        size: 64,
        iters: 50,
        perspective: 0.0,
        angle: 45.0,
        spin_axis: None,
        out: None,
        input: None,
        obj: None,
    };
    for arg in std::env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--demo=") {
            opts.demo = match val.to_ascii_lowercase().as_str() {
                "transforms" => Demo::Transforms,
                "maze" => Demo::Maze,
                "fractal" => Demo::Fractal,
                "arm" => Demo::Arm,
                other => {
                    eprintln!("[warn] Unknown demo '{}', falling back to transforms.", other);
                    Demo::Transforms
                }
            };
        } else if let Some(val) = arg.strip_prefix("--seed=") {
            opts.seed = val.parse().with_context(|| format!("Bad --seed value '{val}'"))?;
        } else if let Some(val) = arg.strip_prefix("--size=") {
            opts.size = val.parse().with_context(|| format!("Bad --size value '{val}'"))?;
        } else if let Some(val) = arg.strip_prefix("--iters=") {
            opts.iters = val.parse().with_context(|| format!("Bad --iters value '{val}'"))?;
        } else if let Some(val) = arg.strip_prefix("--perspective=") {
            opts.perspective = val
                .parse()
                .with_context(|| format!("Bad --perspective value '{val}'"))?;
        } else if let Some(val) = arg.strip_prefix("--angle=") {
            opts.angle = val.parse().with_context(|| format!("Bad --angle value '{val}'"))?;
        } else if let Some(val) = arg.strip_prefix("--spin-axis=") {
            opts.spin_axis = Some(val.parse::<Axis>()?);
        } else if let Some(val) = arg.strip_prefix("--out=") {
            opts.out = Some(val.to_string());
        } else if let Some(val) = arg.strip_prefix("--in=") {
            opts.input = Some(val.to_string());
        } else if let Some(val) = arg.strip_prefix("--obj=") {
            opts.obj = Some(val.to_string());
        } else {
            eprintln!("[warn] Ignoring unknown argument '{}'.", arg);
        }
    }
    Ok(opts)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_options()?;
    log::info!("Starting gallery3d demo driver: {:?}", opts.demo);
    match opts.demo {
        Demo::Transforms => run_transforms(&opts)?,
        Demo::Maze => run_maze(&opts),
        Demo::Fractal => run_fractal(&opts)?,
        Demo::Arm => run_arm(&opts)?,
    }
    log::info!("Done.");
    Ok(())
}

/// The transform list a fresh demo page starts from, as it would arrive from
/// the server: serialized with ids and kind tags.
const SAVED_TRANSFORMS: &str = r#"[
    {"id": 1, "kind": "translate", "x": 0.20, "y": 0.00, "z": 0.00},
    {"id": 2, "kind": "rotate", "angle_degrees": 30.0, "axis": "y"},
    {"id": 3, "kind": "scale", "x": 1.50, "y": 1.50, "z": 1.50},
    {"id": 4, "kind": "invert", "target": 1}
]"#;

fn run_transforms(opts: &Options) -> Result<()> {
    let saved: Vec<Transform> =
        serde_json::from_str(SAVED_TRANSFORMS).context("Failed to revive saved transforms")?;
    let mut list = TransformList::from_saved(saved);

    if let Some(axis) = opts.spin_axis {
        let id = list.push(TransformOp::Rotate {
            angle_degrees: opts.angle,
            axis,
        });
        log::info!("Appended rotate (id {id})");
    }

    for (i, t) in list.as_slice().iter().enumerate() {
        println!("({}) {}", i + 1, t.label(list.as_slice()));
    }
    let combined = list.compose(opts.perspective);
    print!("{}", format_matrix(&combined));
    Ok(())
}

fn run_maze(opts: &Options) {
    let maze = maze::Maze::generate_with_seed(opts.seed);
    log::info!(
        "Maze buffers: {} position floats, {} normal floats, {} uv floats",
        maze.positions_f32().len(),
        maze.normals_f32().len(),
        maze.uvs_f32().len()
    );
    let sky = geom::primitives::skybox(100.0);
    log::info!(
        "Skybox buffer: {} position floats",
        geom::buffers::positions_f32(&sky).len()
    );

    // Take a short walk to exercise the collision/handoff path.
    let mut walker = maze::Walker::new(maze);
    let input = CameraInput {
        forward: true,
        ..Default::default()
    };
    for _ in 0..240 {
        walker.update(&input);
    }
    log::info!(
        "Walker after 240 frames: room {:?}, position {:?}",
        walker.room(),
        walker.camera().position
    );
    print!("{}", format_matrix(&walker.view_matrix()));
}

fn run_fractal(opts: &Options) -> Result<()> {
    // Either mesh an existing layer PNG or render a fresh Julia layer.
    let layer = match &opts.input {
        Some(path) => fractal::Layer::load_png(path)?,
        None => fractal::Layer::julia(opts.size, -0.76, 0.15, opts.iters),
    };
    if let Some(path) = &opts.out {
        layer.save_png(path)?;
    }
    let mesh = fractal::extrude_layer(&layer);
    log::info!(
        "Fractal mesh: {} triangles, {} color floats",
        mesh.triangle_count(),
        mesh.colors.len()
    );
    Ok(())
}

fn run_arm(opts: &Options) -> Result<()> {
    if let Some(path) = &opts.obj {
        let polygons = geom::obj::load_obj_from_path(path)?;
        log::info!("Loaded {}: {} polygons", path, polygons.len());
    }

    let mut rig = arm::ArmRig::new();
    rig.set_target(mathcore::dvec3(1.5, 0.3, 0.0));
    // Sweep one axis at a time, the way the demo page's sliders drive it.
    for x in [1.0, 1.5, 2.0] {
        rig.set_target_x(x);
        log::info!("target x={x} -> end effector {:?}", rig.end_effector());
    }
    rig.set_target_y(0.8);
    rig.set_target_z(-0.5);
    log::info!(
        "IK target {:?} -> end effector {:?}",
        rig.target(),
        rig.end_effector()
    );

    for (i, snapshot) in rig.scene().snapshots().iter().enumerate() {
        log::info!(
            "node {}: {} triangle vertices",
            i,
            snapshot.triangle_vertices
        );
    }
    Ok(())
}
