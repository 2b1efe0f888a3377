use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;

use graymorph::{
    image::{Image, ImageDtype, ImageSize},
    imgproc::{
        morphology::{self, BorderType, KernelShape, MorphPixel, StructuringElement},
        parallel::ExecutionStrategy,
    },
};

#[derive(FromArgs)]
/// Run dilate, erode, open and close on a synthetic image and report timings
struct Args {
    /// the image width
    #[argh(option, default = "640")]
    width: usize,

    /// the image height
    #[argh(option, default = "480")]
    height: usize,

    /// the number of channels: 1, 3 or 4
    #[argh(option, default = "1")]
    channels: usize,

    /// the pixel type: u8 or f32
    #[argh(option, default = "String::from(\"u8\")")]
    dtype: String,

    /// the kernel size
    #[argh(option, default = "3")]
    kernel_size: usize,

    /// the kernel shape: rect, cross or ellipse
    #[argh(option, default = "String::from(\"rect\")")]
    shape: String,

    /// the border mode: default, constant, replicate, reflect or wrap
    #[argh(option, default = "String::from(\"default\")")]
    border: String,

    /// the border value for the constant border mode
    #[argh(option, default = "0.0")]
    fill: f32,

    /// run on a local pool with this many threads instead of the global pool
    #[argh(option)]
    threads: Option<usize>,

    /// run on the current thread only
    #[argh(switch)]
    serial: bool,

    /// the seed of the synthetic image
    #[argh(option, default = "42")]
    seed: u64,
}

fn parse_shape(shape: &str, size: usize) -> Result<KernelShape, String> {
    let (width, height) = (size, size);
    match shape.to_lowercase().as_str() {
        "rect" => Ok(KernelShape::Rect { width, height }),
        "cross" => Ok(KernelShape::Cross { width, height }),
        "ellipse" => Ok(KernelShape::Ellipse { width, height }),
        other => Err(format!("unknown kernel shape: {other}")),
    }
}

fn parse_border(border: &str) -> Result<BorderType, String> {
    match border.to_lowercase().as_str() {
        "default" | "reflect101" => Ok(BorderType::DEFAULT),
        "constant" => Ok(BorderType::Constant),
        "replicate" => Ok(BorderType::Replicate),
        "reflect" => Ok(BorderType::Reflect),
        "wrap" => Ok(BorderType::Wrap),
        other => Err(format!("unknown border mode: {other}")),
    }
}

fn synthetic_image<T: ImageDtype, const C: usize>(
    size: ImageSize,
    seed: u64,
) -> Result<Image<T, C>, Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..size.width * size.height * C)
        .map(|_| T::from_f32(rng.random_range(0.0f32..256.0).floor()))
        .collect();
    Ok(Image::new(size, data)?)
}

fn run<T: MorphPixel, const C: usize>(
    args: &Args,
    kernel: &StructuringElement,
    border: BorderType,
    strategy: ExecutionStrategy,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let src = synthetic_image::<T, C>(size, args.seed)?;
    let mut dst = Image::<T, C>::from_size_val(size, T::default())?;
    let fill = T::from_f32(args.fill);

    for name in ["dilate", "erode", "open", "close"] {
        let now = Instant::now();
        let (src_view, mut dst_view) = (src.view(), dst.view_mut());
        match name {
            "dilate" => morphology::dilate(&src_view, &mut dst_view, kernel, border, fill, strategy),
            "erode" => morphology::erode(&src_view, &mut dst_view, kernel, border, fill, strategy),
            "open" => morphology::open(&src_view, &mut dst_view, kernel, border, fill, strategy),
            _ => morphology::close(&src_view, &mut dst_view, kernel, border, fill, strategy),
        }?;
        let elapsed = now.elapsed();

        let sum: f32 = dst.as_slice().iter().map(|&v| Into::<f32>::into(v)).sum();
        let mean = sum / dst.as_slice().len() as f32;
        log::info!(
            "{name}: {:.3} ms, output mean {mean:.3}",
            elapsed.as_secs_f64() * 1e3
        );
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let kernel = StructuringElement::from_shape(parse_shape(&args.shape, args.kernel_size)?)?;
    let border = parse_border(&args.border)?;
    let strategy = match (args.serial, args.threads) {
        (true, _) => ExecutionStrategy::Serial,
        (false, Some(n)) => ExecutionStrategy::Fixed(n),
        (false, None) => ExecutionStrategy::ParallelRows,
    };

    log::info!(
        "{}x{} {} C={} kernel {} {}x{} ({} cells) border {:?} strategy {:?}",
        args.width,
        args.height,
        args.dtype,
        args.channels,
        args.shape,
        kernel.width(),
        kernel.height(),
        kernel.neighborhood().len(),
        border,
        strategy,
    );

    match (args.dtype.as_str(), args.channels) {
        ("u8", 1) => run::<u8, 1>(&args, &kernel, border, strategy),
        ("u8", 3) => run::<u8, 3>(&args, &kernel, border, strategy),
        ("u8", 4) => run::<u8, 4>(&args, &kernel, border, strategy),
        ("f32", 1) => run::<f32, 1>(&args, &kernel, border, strategy),
        ("f32", 3) => run::<f32, 3>(&args, &kernel, border, strategy),
        ("f32", 4) => run::<f32, 4>(&args, &kernel, border, strategy),
        (dtype, channels) => {
            Err(format!("unsupported pixel layout: {dtype} with {channels} channels").into())
        }
    }
}
