#![cfg_attr(not(test), allow(dead_code, unused_imports))]

use std::{
    fmt::Display,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use glsl_parse::syntax::Node;
use qshade::{ConstValue, ShaderProcessor, UniformBinding};
use serde::Deserialize;

#[derive(Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
enum Expect {
    Pass,
    Fail,
}

impl Display for Expect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expect::Pass => f.write_str("Pass"),
            Expect::Fail => f.write_str("Fail"),
        }
    }
}

#[derive(Deserialize)]
struct SyntaxTest {
    name: String,
    code: String,
    expect: Expect,
    note: Option<String>,
}

fn round_trip(nodes: &[Node]) -> Result<Vec<Node>, glsl_parse::Error> {
    glsl_parse::compile(&glsl_parse::reconstruct(nodes))
}

fn sources(dir: &str, ext: &str) -> Vec<PathBuf> {
    let dir = std::fs::read_dir(dir).unwrap_or_else(|_| panic!("missing directory {dir}"));
    let mut paths = dir
        .map(|entry| entry.expect("error reading entry").path())
        .filter(|path| path.extension().is_some_and(|e| e == ext))
        .collect::<Vec<_>>();
    paths.sort();
    paths
}

fn json_test(path: &Path) -> (u32, u32) {
    let mut fails = 0;
    println!("testing json-test `{}`", path.display());

    let file = File::open(path).expect("failed to read file");
    let reader = BufReader::new(file);
    let json: Vec<SyntaxTest> = serde_json::from_reader(reader)
        .inspect_err(|err| eprintln!("{err}"))
        .expect("invalid json test file");

    for test in &json {
        print!(" * `{}` expect: {}, result: ", test.name, test.expect);

        let res = glsl_parse::compile(&test.code);
        let pass = match &res {
            Ok(_) => Expect::Pass,
            Err(_) => Expect::Fail,
        };
        println!("{pass}");

        if pass != test.expect {
            println!(
                "   TEST FAILED{}\n   * code:`{}`\n   * result: {:?}\n",
                test.note
                    .as_ref()
                    .map(|note| format!(" (note: {note})"))
                    .unwrap_or_default(),
                test.code,
                res
            );
            fails += 1;
        } else if let Ok(nodes) = &res {
            let disp = round_trip(nodes);
            if disp.as_ref() != Ok(nodes) {
                println!(
                    "   ROUND TRIP FAILED\n   * code:`{}`\n   * reconstructed: `{}`\n   * result: {:?}\n",
                    test.code,
                    glsl_parse::reconstruct(nodes),
                    disp
                );
                fails += 1;
            }
        }
    }

    (fails, json.len() as u32)
}

#[test]
fn conformance() {
    let mut total_fails = 0;
    let mut total_count = 0;

    for path in sources("conformance", "json") {
        let (fails, count) = json_test(&path);
        println!("{fails}/{count} failures");
        total_fails += fails;
        total_count += count;
    }

    let total_pass = total_count - total_fails;
    println!("SUMMARY: {total_pass}/{total_count} Pass, {total_fails}/{total_count} Fails");
    assert!(total_count > 0);
    assert!(total_fails == 0);
}

#[test]
fn sample_shaders() {
    let paths = sources("shaders", "frag");
    assert!(!paths.is_empty());
    for path in paths {
        println!("testing sample shader `{}`", path.display());
        let source = std::fs::read_to_string(&path).expect("failed to read file");
        let nodes = glsl_parse::compile(&source)
            .inspect_err(|err| eprintln!("{err}"))
            .expect("parse error");
        let disp = glsl_parse::reconstruct(&nodes);
        let disp_nodes = glsl_parse::compile(&disp)
            .inspect_err(|err| eprintln!("{err}"))
            .expect("parse error");
        assert_eq!(nodes, disp_nodes);
        assert_eq!(glsl_parse::reconstruct(&disp_nodes), disp);
    }
}

fn read_shader(name: &str) -> String {
    std::fs::read_to_string(Path::new("shaders").join(name)).expect("failed to read file")
}

fn binding(source_name: &str, ty: &str) -> UniformBinding {
    UniformBinding {
        source_name: source_name.to_string(),
        ty: ty.to_string(),
    }
}

#[test]
fn process_galaxy_stars() {
    let mut processor = ShaderProcessor::new();
    processor
        .data
        .insert("starPositionsWidth".to_string(), ConstValue::Scalar(50.0));
    processor
        .data
        .insert("starPositionsHeight".to_string(), ConstValue::Scalar(40.0));

    let output = processor
        .try_process(&read_shader("galaxy_stars.frag"))
        .inspect_err(|err| eprintln!("{err}"))
        .expect("processing error");

    assert!(output.contains("const int starPositionsWidth = 50;"));
    assert!(output.contains("const int starPositionsHeight = 40;"));
    assert!(output.contains("const float PI = 3.14159265359;"));
    assert_eq!(processor.uniforms.len(), 3);
    assert_eq!(
        processor.uniforms["starPositions"],
        binding("uStarPositions", "sampler2D")
    );
    assert_eq!(processor.uniforms["screenSize"], binding("uScreenSize", "vec2"));
    assert_eq!(processor.uniforms["rng"], binding("uRng", "vec3"));
    glsl_parse::compile(&output).expect("output does not parse");
}

#[test]
fn process_polarize_update() {
    let mut processor = ShaderProcessor::new();
    for (name, value) in [
        ("REPULSE_RING", ConstValue::Vector(vec![3.0, 1.0])),
        ("REPULSE_STRENGTH", ConstValue::Scalar(1.5)),
        ("ATTRACT_RING", ConstValue::Vector(vec![6.0, 4.0])),
        ("ATTRACT_STRENGTH", ConstValue::Scalar(2.0)),
        ("GRID_WIDTH", ConstValue::Scalar(64.0)),
        ("GRID_HEIGHT", ConstValue::Scalar(48.0)),
    ] {
        processor.data.insert(name.to_string(), value);
    }

    let output = processor
        .try_process(&read_shader("polarize_update.frag"))
        .inspect_err(|err| eprintln!("{err}"))
        .expect("processing error");

    assert!(output.contains("const ivec2 REPULSE_RING = ivec2(3, 1);"));
    assert!(output.contains("const float REPULSE_STRENGTH = 1.5;"));
    assert!(output.contains("const ivec2 ATTRACT_RING = ivec2(6, 4);"));
    assert!(output.contains("const float ATTRACT_STRENGTH = 2.0;"));
    assert!(output.contains("const int GRID_WIDTH = 64;"));
    assert!(output.contains("const vec2 GRID = vec2(float(GRID_WIDTH), float(GRID_HEIGHT));"));
    assert_eq!(processor.uniforms["sand"], binding("uSand", "sampler2D"));
    assert_eq!(processor.uniforms["elapsed"], binding("uElapsed", "float"));
}

#[test]
fn process_falls_back_on_bad_values() {
    let source = read_shader("gas_render.frag");
    let mut processor = ShaderProcessor::new();
    processor
        .data
        .insert("gridWidth".to_string(), ConstValue::Vector(vec![1.0, 2.0]));

    assert!(processor.try_process(&source).is_err());
    assert_eq!(processor.process(&source), source);
    assert!(processor.uniforms.is_empty());
}
