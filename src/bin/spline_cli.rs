#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("spline_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use spline_engine::MAX_SAMPLES_PER_SEGMENT;
    use spline_engine::geom::{BezierBasis, ParameterPolicy, Point3, Spline, SplineOptions};
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"spline_cli (spline-engine)

USAGE:
  spline_cli eval <t> [options]
  spline_cli tessellate [options]

OPTIONS (eval):
  --points <x,y,z;...>   Control points, 1 + 3n of them (default: two-segment demo)
  --basis <name>         polynomial | bernstein | de-casteljau (default: polynomial)
  --clamp                Clamp t into [0, segment_count] instead of failing

OPTIONS (tessellate):
  --points <x,y,z;...>   Control points, 1 + 3n of them (default: two-segment demo)
  --samples <n>          Samples per segment, 1..=1024 (default: 16)
  --obj <path>           Write the polyline as OBJ instead of printing it
  --overwrite            Overwrite an existing OBJ file

  -h, --help             Show this help
"#;

    const DEMO_POINTS: [[f64; 3]; 7] = [
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, -1.0, 0.0],
        [2.0, -1.0, 0.0],
        [2.0, 0.0, 0.0],
    ];

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "eval" => cmd_eval(&mut args),
            "tessellate" => cmd_tessellate(&mut args),
            "-h" | "--help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_eval(args: &mut Args) -> Result<(), String> {
        let raw_t = args.next().ok_or("missing parameter t")?;
        if raw_t == "-h" || raw_t == "--help" {
            print_usage();
            return Ok(());
        }
        let t: f64 = raw_t
            .parse()
            .map_err(|e| format!("invalid parameter `{raw_t}`: {e}"))?;

        let mut points: Option<Vec<Point3>> = None;
        let mut options = SplineOptions::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--points" => points = Some(parse_points(&args.value("--points")?)?),
                "--basis" => options = options.with_basis(parse_basis(&args.value("--basis")?)?),
                "--clamp" => options = options.with_parameter_policy(ParameterPolicy::Clamp),
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let spline = build_spline(points)?.with_options(options);
        let p = spline.evaluate(t).map_err(|e| e.to_string())?;
        println!("{} {} {}", p.x, p.y, p.z);
        Ok(())
    }

    fn cmd_tessellate(args: &mut Args) -> Result<(), String> {
        let mut points: Option<Vec<Point3>> = None;
        let mut samples = SplineOptions::new().samples_per_segment;
        let mut obj_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--points" => points = Some(parse_points(&args.value("--points")?)?),
                "--samples" => {
                    let raw = args.value("--samples")?;
                    samples = raw
                        .parse()
                        .map_err(|e| format!("invalid sample count `{raw}`: {e}"))?;
                    if samples > MAX_SAMPLES_PER_SEGMENT {
                        return Err(format!(
                            "sample count {samples} exceeds the maximum of {MAX_SAMPLES_PER_SEGMENT}"
                        ));
                    }
                }
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let spline = build_spline(points)?;
        let polyline: Vec<Point3> = spline.tessellate(samples).collect();

        match obj_path {
            Some(path) => {
                write_obj_file(&path, &polyline, overwrite)?;
                println!("wrote {} vertices to {}", polyline.len(), path.display());
            }
            None => {
                for p in &polyline {
                    println!("{} {} {}", p.x, p.y, p.z);
                }
            }
        }
        Ok(())
    }

    fn build_spline(points: Option<Vec<Point3>>) -> Result<Spline, String> {
        let points =
            points.unwrap_or_else(|| DEMO_POINTS.iter().copied().map(Point3::from).collect());
        Spline::from_points(points).map_err(|e| e.to_string())
    }

    fn parse_basis(raw: &str) -> Result<BezierBasis, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "polynomial" => Ok(BezierBasis::Polynomial),
            "bernstein" => Ok(BezierBasis::Bernstein),
            "de-casteljau" | "decasteljau" => Ok(BezierBasis::DeCasteljau),
            other => Err(format!(
                "unknown basis `{other}` (expected polynomial, bernstein or de-casteljau)"
            )),
        }
    }

    fn parse_points(raw: &str) -> Result<Vec<Point3>, String> {
        raw.split(';')
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| {
                let coords = chunk
                    .split(',')
                    .map(|c| {
                        c.trim()
                            .parse::<f64>()
                            .map_err(|e| format!("invalid coordinate `{c}`: {e}"))
                    })
                    .collect::<Result<Vec<f64>, String>>()?;
                match coords.as_slice() {
                    [x, y, z] => Ok(Point3::new(*x, *y, *z)),
                    _ => Err(format!("point `{chunk}` must have exactly 3 coordinates")),
                }
            })
            .collect()
    }

    fn write_obj_file(path: &Path, polyline: &[Point3], overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# spline-engine spline_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o spline").map_err(|e| format!("write obj: {e}"))?;

        for p in polyline {
            writeln!(w, "v {} {} {}", p.x, p.y, p.z).map_err(|e| format!("write obj: {e}"))?;
        }

        if polyline.len() > 1 {
            let indices: Vec<String> = (1..=polyline.len()).map(|i| i.to_string()).collect();
            writeln!(w, "l {}", indices.join(" ")).map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
