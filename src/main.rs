extern crate cairo;

//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

#[macro_use]
extern crate error_chain;

mod errors {

    error_chain!{

        foreign_links {
            Io(::std::io::Error) #[cfg(unix)];
            Cairo(::cairo::Error);
            CairoBorrow(::cairo::BorrowError);
            Image(::image::ImageError);
        }

    }

}

use errors::*;

//////////////////////////////////////////////////////////////////////
// define a statically allocated map for
// family lookup during argument parsing

use phf::phf_map;

//////////////////////////////////////////////////////////////////////
// define some constants for rep-tile geometry

const PI: f64 = std::f64::consts::PI;

// acute angle of the 1-2-sqrt(5) right triangle, atan2(1, 2)
const PINWHEEL_ALPHA: f64 = 0.4636476090008061;

const TWO_OVER_SQRT5: f64 = 0.8944271909999159;
const SQRT3: f64 = 1.7320508075688772;

// interior angle of the equilateral module
const SPHINX_ALPHA: f64 = PI / 3.0;

//////////////////////////////////////////////////////////////////////
// constants for rendering

const DEFAULT_CANVAS: i32 = 2048;
const CMAP_RESOLUTION: usize = 1024;
const BACKGROUND: [u8; 3] = [255, 255, 255];
const DEFAULT_OUTPUT: &str = "reptile.png";

// cyclic colormap: one phase-shifted cosine ramp per channel.
// amplitude stays below full scale so no tile color can equal the
// background
const CMAP_SHIFT: [f64; 3] = [0.0, 2.0 * PI / 3.0, 4.0 * PI / 3.0];
const CMAP_BASE: f64 = 0.5;
const CMAP_AMP: f64 = 0.45;

//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra

type Vec2d = nalgebra::Vector2<f64>;
type Vec3d = nalgebra::Vector3<f64>;
type Point2d = nalgebra::geometry::Point2<f64>;
type Translation2d = nalgebra::Translation2<f64>;
type Rotation2d = nalgebra::Rotation2<f64>;
type Transform2d = nalgebra::Transform2<f64>;
type Matrix3d = nalgebra::Matrix3<f64>;

//////////////////////////////////////////////////////////////////////
// geometric primitives shared by the shape constructors

// rotate a vector by the given angle
fn rotate(v: &Vec2d, theta: f64) -> Vec2d {
    Rotation2d::new(theta) * v
}

// angle of a vector against the positive x axis
fn phase(v: &Vec2d) -> f64 {
    v.y.atan2(v.x)
}

// chirality of the (short, long) reference frame via the 2d cross
// product; zero or NaN means a degenerate frame
fn leg_sign(short_leg: &Vec2d, long_leg: &Vec2d) -> Result<f64> {

    let cross = short_leg.perp(long_leg);

    if cross == 0.0 || cross.is_nan() {
        bail!("degenerate shape: reference legs are collinear or zero length");
    }

    Ok(cross.signum())

}

//////////////////////////////////////////////////////////////////////
// Rect2d type has lower-left p0 and upper-right p1

struct Rect2d {

    p0: Point2d,
    p1: Point2d

}

impl Rect2d {

    // new rect from points
    fn new(p0: Point2d, p1: Point2d) -> Self {
        Rect2d { p0: p0, p1: p1 }
    }

    // dimensions of this rect
    fn dims(&self) -> Vec2d {
        self.p1 - self.p0
    }

    // center of this rect
    fn center(&self) -> Point2d {
        self.p0 + 0.5*(self.p1 - self.p0)
    }

}

//////////////////////////////////////////////////////////////////////
//
// make a Transform2d that will translate and scale the given
// contents_rect (input) to the given page_rect (output).
//
// always includes vertical flip because graphics coordinate system
// is left-handed (y increases going down)
//

fn get_page_transform(contents_rect: &Rect2d,
                      page_rect: &Rect2d) -> Transform2d {

    let cdims = contents_rect.dims();
    let pdims = page_rect.dims();

    let scl = (pdims.component_div(&cdims)).min();

    let vmid = contents_rect.center();
    let pmid = page_rect.center();

    let translate_page = Translation2d::new(pmid[0], pmid[1]);

    let scale = Transform2d::from_matrix_unchecked(
        Matrix3d::new(
            scl, 0.0, 0.0,
            0.0, -scl, 0.0,
            0.0, 0.0, 1.0
        )
    );

    let translate_points = Translation2d::new(-vmid[0], -vmid[1]);

    translate_page * scale * translate_points

}

//////////////////////////////////////////////////////////////////////
// pinwheel rep-tile: a 1:2 right triangle that subdivides into five
// smaller copies at linear scale 1/sqrt(5)
//
//   P
//   | .
//   |   .
//   b     c
//   | .     .
//   |   .     d
//   |     .     .
//   Q . . . a . . . R
//
// Q is the origin, R the far end of the long leg, P the far end of
// the short leg; a, b, c, d are the interior split points shared by
// the five children

#[derive(Debug, PartialEq, Clone)]
struct Pinwheel {

    origin: Point2d, // Q
    index:  Point2d, // R
    thumb:  Point2d, // P

    sign: f64,

    a: Point2d,
    b: Point2d,
    c: Point2d,
    d: Point2d

}

impl Pinwheel {

    fn new(origin: Point2d, index: Point2d, thumb: Point2d) -> Result<Pinwheel> {

        let qp = thumb - origin;
        let qr = index - origin;

        let sign = leg_sign(&qp, &qr)?;

        let qa = rotate(&qp, sign * 0.5 * PI);
        let qc = TWO_OVER_SQRT5 * rotate(&qp, sign * PINWHEEL_ALPHA);
        let qb = 0.5 * qc;

        let a = origin + qa;
        let c = origin + qc;
        let b = origin + qb;

        let d = a + qb;

        Ok(Pinwheel {
            origin: origin,
            index: index,
            thumb: thumb,
            sign: sign,
            a: a,
            b: b,
            c: c,
            d: d
        })

    }

}

//////////////////////////////////////////////////////////////////////
// sphinx rep-tile: a pointed hexagon built on an equilateral module,
// subdividing into four half-scale copies
//
//           P
//          . .
//         .   .
//        f     a . . . b
//       . .           . .
//      h   .         .   .
//     .     .       .     .
//    Q . . . e . . . . . . R
//
// Q/R span the long base and P is the peak; a and b finish the
// perimeter, while e, f, h anchor the four children

#[derive(Debug, PartialEq, Clone)]
struct Sphinx {

    origin: Point2d, // Q
    index:  Point2d, // R
    thumb:  Point2d, // P

    sign: f64,

    a: Point2d,
    b: Point2d,
    e: Point2d,
    f: Point2d,
    h: Point2d

}

impl Sphinx {

    fn new(origin: Point2d, index: Point2d, thumb: Point2d) -> Result<Sphinx> {

        let qp = thumb - origin;
        let qr = index - origin;

        let sign = leg_sign(&qp, &qr)?;

        // reflection-like rotation of half the short leg
        let pa = 0.5 * rotate(&qp, 2.0 * sign * SPHINX_ALPHA);

        let qe = 0.5 * qr;
        let qh = 0.25 * qp;

        let a = thumb + pa;
        let b = index - pa;
        let e = origin + qe;
        let h = origin + qh;
        let f = e - pa;

        Ok(Sphinx {
            origin: origin,
            index: index,
            thumb: thumb,
            sign: sign,
            a: a,
            b: b,
            e: e,
            f: f,
            h: h
        })

    }

}

//////////////////////////////////////////////////////////////////////
// closed shape abstraction over the two rep-tile families

#[derive(Debug, PartialEq, Clone)]
enum RepTile {
    Pinwheel(Pinwheel),
    Sphinx(Sphinx)
}

impl RepTile {

    // classic right triangle with legs 1 and 2 and the right angle
    // at the origin
    fn pinwheel() -> Result<RepTile> {

        Ok(RepTile::Pinwheel(Pinwheel::new(
            Point2d::new(0.0, 0.0),
            Point2d::new(2.0, 0.0),
            Point2d::new(0.0, 1.0))?))

    }

    // pointed hexagon assembled from six equilateral triangles
    fn sphinx() -> Result<RepTile> {

        Ok(RepTile::Sphinx(Sphinx::new(
            Point2d::new(0.0, 0.0),
            Point2d::new(6.0, 0.0),
            Point2d::new(2.0, 2.0 * SQRT3))?))

    }

    fn branch_factor(&self) -> usize {
        match self {
            RepTile::Pinwheel(_) => 5,
            RepTile::Sphinx(_) => 4
        }
    }

    // some children of a subdivision are mirror-chiral to their
    // siblings in both families, so every constructor recomputes its
    // own sign
    fn subdivide(&self) -> Result<Vec<RepTile>> {

        let children = match self {

            RepTile::Pinwheel(t) => vec![
                RepTile::Pinwheel(Pinwheel::new(t.c, t.origin, t.thumb)?),
                RepTile::Pinwheel(Pinwheel::new(t.b, t.a, t.origin)?),
                RepTile::Pinwheel(Pinwheel::new(t.b, t.a, t.c)?),
                RepTile::Pinwheel(Pinwheel::new(t.d, t.index, t.a)?),
                RepTile::Pinwheel(Pinwheel::new(t.d, t.c, t.a)?)
            ],

            RepTile::Sphinx(t) => vec![
                RepTile::Sphinx(Sphinx::new(t.e, t.origin, t.f)?),
                RepTile::Sphinx(Sphinx::new(t.index, t.e, t.b)?),
                RepTile::Sphinx(Sphinx::new(t.f, t.b, t.e)?),
                RepTile::Sphinx(Sphinx::new(t.thumb, t.h, t.a)?)
            ]

        };

        Ok(children)

    }

    // closed boundary point sequence (first point repeated at the end)
    fn perimeter(&self) -> Vec<Point2d> {

        let mut points = match self {
            RepTile::Pinwheel(t) => vec![t.origin, t.thumb, t.index],
            RepTile::Sphinx(t) => vec![t.origin, t.thumb, t.a, t.b, t.index]
        };

        points.push(points[0]);

        points

    }

    fn orientation_sign(&self) -> f64 {
        match self {
            RepTile::Pinwheel(t) => t.sign,
            RepTile::Sphinx(t) => t.sign
        }
    }

    // orientation scalar in [0, 2*pi) used for coloring: phase of the
    // short leg, pushed half a turn for left-handed tiles
    fn orientation(&self) -> f64 {

        let (origin, thumb) = match self {
            RepTile::Pinwheel(t) => (&t.origin, &t.thumb),
            RepTile::Sphinx(t) => (&t.origin, &t.thumb)
        };

        let mut angle = phase(&(thumb - origin));

        if self.orientation_sign() < 0.0 {
            angle += PI;
        }

        angle.rem_euclid(2.0 * PI)

    }

    // largest real component of the perimeter
    fn max_real(&self) -> f64 {
        self.perimeter().iter().fold(f64::MIN, |m, p| m.max(p.x))
    }

    // largest imaginary component of the perimeter
    fn max_imag(&self) -> f64 {
        self.perimeter().iter().fold(f64::MIN, |m, p| m.max(p.y))
    }

}

// 0-input function generating a seed shape
type SeedFunc = fn() -> Result<RepTile>;

// define a lookup table matching strings to seed constructors
const VALID_FAMILIES: phf::Map<&'static str, SeedFunc> = phf_map! {
    "pinwheel" => RepTile::pinwheel,
    "sphinx" => RepTile::sphinx,
};

//////////////////////////////////////////////////////////////////////
// tiling driver: a single seed shape, then generation-by-generation
// subdivision replacing the whole collection each step

#[derive(Debug)]
struct Tiling {
    shapes: Vec<RepTile>,
    generation: usize
}

impl Tiling {

    fn seed(shape: RepTile) -> Tiling {

        Tiling {
            shapes: vec![shape],
            generation: 1
        }

    }

    // replace the current generation with every shape's children, in
    // input order
    fn subdivide(&mut self) -> Result<()> {

        let branch = match self.shapes.first() {
            None => { return Ok(()); }
            Some(shape) => shape.branch_factor()
        };

        let mut next = Vec::with_capacity(self.shapes.len() * branch);

        for shape in &self.shapes {
            next.extend(shape.subdivide()?);
        }

        self.shapes = next;
        self.generation += 1;

        Ok(())

    }

}

//////////////////////////////////////////////////////////////////////
// colormap construction and lookup

fn build_colormap(resolution: usize) -> Vec<Vec3d> {

    (0..resolution).map(|i| {

        let t = 2.0 * PI * (i as f64) / (resolution as f64);

        Vec3d::new(
            CMAP_BASE + CMAP_AMP * (t + CMAP_SHIFT[0]).cos(),
            CMAP_BASE + CMAP_AMP * (t + CMAP_SHIFT[1]).cos(),
            CMAP_BASE + CMAP_AMP * (t + CMAP_SHIFT[2]).cos())

    }).collect()

}

// map an orientation in [0, 2*pi) onto a colormap entry
fn color_index(orientation: f64, resolution: usize) -> usize {

    let u = orientation / (2.0 * PI);

    ((u * resolution as f64) as usize).min(resolution - 1)

}

//////////////////////////////////////////////////////////////////////
// some drawing conveniences for cairo

trait CairoVecOps {

    fn setcolor(&self, v: &Vec3d);
    fn drawpoly(&self, poly: &Vec<Point2d>);

}

impl CairoVecOps for cairo::Context {

    fn setcolor(&self, v: &Vec3d) {
        self.set_source_rgb(v[0], v[1], v[2]);
    }

    fn drawpoly(&self, poly: &Vec<Point2d>) {
        for (i, p) in poly.iter().enumerate() {
            if i == 0 {
                self.move_to(p[0], p[1]);
            } else {
                self.line_to(p[0], p[1]);
            }
        }
        self.close_path();
    }

}

//////////////////////////////////////////////////////////////////////
// render configuration, built by the CLI layer and passed down

#[derive(Debug)]
struct RenderConfig {
    canvas: i32,            // square canvas edge in pixels, pre-trim
    cmap_resolution: usize, // number of colormap entries
    background: [u8; 3],
    as_rectangle: bool,     // overlay the half-turn copy after trimming
    output: String
}

//////////////////////////////////////////////////////////////////////
// rasterize the final generation: fill one polygon per tile, colored
// by orientation, then trim the uniform border and save

fn render(shapes: &Vec<RepTile>, config: &RenderConfig) -> Result<()> {

    if shapes.is_empty() {
        bail!("no shapes to render");
    }

    // canvas bounds hug the tiling, anchored at the seed origin
    let mut upper = Point2d::new(0.0, 0.0);

    for shape in shapes {
        upper.x = upper.x.max(shape.max_real());
        upper.y = upper.y.max(shape.max_imag());
    }

    let contents_rect = Rect2d::new(Point2d::new(0.0, 0.0), upper);

    let page_rect = Rect2d::new(
        Point2d::new(0.0, 0.0),
        Point2d::new(config.canvas as f64, config.canvas as f64));

    let transform = get_page_transform(&contents_rect, &page_rect);

    let cmap = build_colormap(config.cmap_resolution);

    let mut surface = cairo::ImageSurface::create(
        cairo::Format::Rgb24, config.canvas, config.canvas)?;

    {

        let ctx = cairo::Context::new(&surface);

        let bg = &config.background;

        ctx.set_source_rgb(bg[0] as f64 / 255.0,
                           bg[1] as f64 / 255.0,
                           bg[2] as f64 / 255.0);
        ctx.paint();

        for shape in shapes {

            let poly: Vec<Point2d> = shape.perimeter().iter().map(
                |p| transform * p).collect();

            let cidx = color_index(shape.orientation(), config.cmap_resolution);

            ctx.drawpoly(&poly);
            ctx.setcolor(&cmap[cidx]);
            ctx.fill();

        }

    }

    surface.flush();

    let img = surface_to_image(&mut surface)?;
    let img = trim_border(img, config.background);

    let img = if config.as_rectangle {
        complete_rectangle(img, config.background)
    } else {
        img
    };

    img.save(&config.output).chain_err(
        || format!("writing {:}", config.output))?;

    Ok(())

}

//////////////////////////////////////////////////////////////////////
// copy a finished cairo surface into an image buffer for trimming

fn surface_to_image(surface: &mut cairo::ImageSurface) -> Result<image::RgbImage> {

    let width = surface.get_width();
    let height = surface.get_height();
    let stride = surface.get_stride() as usize;

    let data = surface.get_data()?;

    let mut img = image::RgbImage::new(width as u32, height as u32);

    for y in 0..height as usize {

        let row = &data[y * stride..];

        for x in 0..width as usize {

            // Rgb24 pixels sit in memory as b, g, r, x on
            // little-endian hosts
            let px = &row[4 * x..];

            img.put_pixel(x as u32, y as u32,
                          image::Rgb([px[2], px[1], px[0]]));

        }

    }

    Ok(img)

}

//////////////////////////////////////////////////////////////////////
// trim uniform-background rows/columns inward from all four edges,
// stopping at the first row/column holding any foreground pixel

fn trim_border(mut img: image::RgbImage, background: [u8; 3]) -> image::RgbImage {

    let bg = image::Rgb(background);

    let (width, height) = img.dimensions();

    let row_marked = |img: &image::RgbImage, y: u32| {
        (0..width).any(|x| *img.get_pixel(x, y) != bg)
    };

    let col_marked = |img: &image::RgbImage, x: u32| {
        (0..height).any(|y| *img.get_pixel(x, y) != bg)
    };

    let top = match (0..height).find(|&y| row_marked(&img, y)) {
        None => { return img; }
        Some(y) => y
    };

    let bottom = match (0..height).rev().find(|&y| row_marked(&img, y)) {
        None => { return img; }
        Some(y) => y
    };

    let left = match (0..width).find(|&x| col_marked(&img, x)) {
        None => { return img; }
        Some(x) => x
    };

    let right = match (0..width).rev().find(|&x| col_marked(&img, x)) {
        None => { return img; }
        Some(x) => x
    };

    image::imageops::crop(&mut img, left, top,
                          right - left + 1,
                          bottom - top + 1).to_image()

}

//////////////////////////////////////////////////////////////////////
// overlay the half-turn copy of the image onto its own background
// pixels, completing e.g. a pinwheel triangle into a rectangle

fn complete_rectangle(mut img: image::RgbImage, background: [u8; 3]) -> image::RgbImage {

    let rotated = image::imageops::rotate180(&img);

    for (x, y, pixel) in img.enumerate_pixels_mut() {

        if pixel.0 == background {
            *pixel = *rotated.get_pixel(x, y);
        }

    }

    img

}

//////////////////////////////////////////////////////////////////////
// runtime configuration, parsed and validated up front before any
// geometry runs

#[derive(Debug)]
struct Config {
    family: String,
    seed: SeedFunc,
    iterations: usize,
    render: RenderConfig
}

impl Config {

    // args here excludes the program name
    fn from_args(args: &[String]) -> Result<Config> {

        let mut positional = Vec::new();
        let mut as_rectangle = false;

        for arg in args {

            if arg == "--rectangle" {
                as_rectangle = true;
            } else if arg.starts_with('-') {
                bail!("unrecognized option: {:}", arg);
            } else {
                positional.push(arg.as_str());
            }

        }

        if positional.len() < 2 || positional.len() > 3 {
            bail!("expected FAMILY ITERATIONS [OUTPUT], got {:} argument(s)",
                  positional.len());
        }

        let family = positional[0];

        let seed = match VALID_FAMILIES.get(family) {

            Some(&func) => func,

            None => {

                let mut families: Vec<&str> =
                    VALID_FAMILIES.keys().cloned().collect();

                families.sort();

                bail!("unrecognized rep-tile family \"{:}\", expected one of: {:}",
                      family, families.join(", "));

            }

        };

        let iterations = match positional[1].parse::<usize>() {
            Ok(count) => count,
            Err(_) => bail!("invalid iteration count \"{:}\"", positional[1])
        };

        if iterations < 1 {
            bail!("iteration count must be at least 1");
        }

        let output = match positional.get(2) {
            Some(path) => path.to_string(),
            None => DEFAULT_OUTPUT.to_string()
        };

        Ok(Config {
            family: family.to_string(),
            seed: seed,
            iterations: iterations,
            render: RenderConfig {
                canvas: DEFAULT_CANVAS,
                cmap_resolution: CMAP_RESOLUTION,
                background: BACKGROUND,
                as_rectangle: as_rectangle,
                output: output
            }
        })

    }

}

//////////////////////////////////////////////////////////////////////

fn run() -> Result<()> {

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("usage: {:?} FAMILY ITERATIONS [OUTPUT] [--rectangle]",
                  args[0]);
        std::process::exit(1);
    }

    let config = Config::from_args(&args[1..])?;

    let seed = (config.seed)()?;

    println!("seeded {:} tile ({:} children per subdivision)",
             config.family, seed.branch_factor());

    let mut tiling = Tiling::seed(seed);

    for _ in 1..config.iterations {

        tiling.subdivide()?;

        println!("generation {:}: {:} tiles",
                 tiling.generation, tiling.shapes.len());

    }

    render(&tiling.shapes, &config.render)?;

    println!("wrote {:}", config.render.output);

    Ok(())

}

quick_main!(run);

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // shoelace area of a closed perimeter
    fn polygon_area(points: &Vec<Point2d>) -> f64 {

        let mut sum = 0.0;

        for i in 0..points.len() - 1 {
            sum += points[i].x * points[i + 1].y
                - points[i + 1].x * points[i].y;
        }

        0.5 * sum.abs()

    }

    // (short, long) reference leg lengths
    fn legs(shape: &RepTile) -> (f64, f64) {
        match shape {
            RepTile::Pinwheel(t) =>
                ((t.thumb - t.origin).norm(), (t.index - t.origin).norm()),
            RepTile::Sphinx(t) =>
                ((t.thumb - t.origin).norm(), (t.index - t.origin).norm())
        }
    }

    fn to_args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pinwheel_subdivides_into_five() {

        let children = RepTile::pinwheel().unwrap().subdivide().unwrap();

        assert_eq!(children.len(), 5);

    }

    #[test]
    fn sphinx_subdivides_into_four() {

        let children = RepTile::sphinx().unwrap().subdivide().unwrap();

        assert_eq!(children.len(), 4);

    }

    #[test]
    fn pinwheel_children_conserve_area() {

        let parent = RepTile::pinwheel().unwrap();

        let parent_area = polygon_area(&parent.perimeter());
        assert!(close(parent_area, 1.0));

        let total: f64 = parent.subdivide().unwrap().iter().map(
            |child| polygon_area(&child.perimeter())).sum();

        assert!(close(total, parent_area));

    }

    #[test]
    fn sphinx_children_conserve_area() {

        let parent = RepTile::sphinx().unwrap();

        let parent_area = polygon_area(&parent.perimeter());
        assert!(close(parent_area, 6.0 * SQRT3));

        let total: f64 = parent.subdivide().unwrap().iter().map(
            |child| polygon_area(&child.perimeter())).sum();

        assert!(close(total, parent_area));

    }

    #[test]
    fn subdivision_mixes_chirality() {

        let children = RepTile::pinwheel().unwrap().subdivide().unwrap();

        for child in &children {
            let sign = child.orientation_sign();
            assert!(sign == 1.0 || sign == -1.0);
        }

        assert!(children.iter().any(|c| c.orientation_sign() == 1.0));
        assert!(children.iter().any(|c| c.orientation_sign() == -1.0));

    }

    #[test]
    fn construction_is_pure() {

        let origin = Point2d::new(0.5, -1.25);
        let index = Point2d::new(4.5, 0.75);
        let thumb = Point2d::new(-0.5, 0.75);

        let first = Pinwheel::new(origin, index, thumb).unwrap();
        let second = Pinwheel::new(origin, index, thumb).unwrap();

        assert_eq!(first, second);

        let first = Sphinx::new(origin, index, thumb).unwrap();
        let second = Sphinx::new(origin, index, thumb).unwrap();

        assert_eq!(first, second);

    }

    #[test]
    fn pinwheel_scale_law() {

        let parent = RepTile::pinwheel().unwrap();
        let (parent_short, parent_long) = legs(&parent);

        let ratio = 1.0 / 5.0f64.sqrt();

        for child in parent.subdivide().unwrap() {
            let (short, long) = legs(&child);
            assert!(close(short, ratio * parent_short));
            assert!(close(long, ratio * parent_long));
        }

    }

    #[test]
    fn sphinx_scale_law() {

        let parent = RepTile::sphinx().unwrap();
        let (parent_short, parent_long) = legs(&parent);

        for child in parent.subdivide().unwrap() {
            let (short, long) = legs(&child);
            assert!(close(short, 0.5 * parent_short));
            assert!(close(long, 0.5 * parent_long));
        }

    }

    #[test]
    fn generation_counts_follow_branch_factor() {

        let mut tiling = Tiling::seed(RepTile::pinwheel().unwrap());
        assert_eq!(tiling.shapes.len(), 1);

        tiling.subdivide().unwrap();
        assert_eq!(tiling.shapes.len(), 5);

        tiling.subdivide().unwrap();
        assert_eq!(tiling.shapes.len(), 25);
        assert_eq!(tiling.generation, 3);

        let mut tiling = Tiling::seed(RepTile::sphinx().unwrap());

        tiling.subdivide().unwrap();
        assert_eq!(tiling.shapes.len(), 4);

        tiling.subdivide().unwrap();
        assert_eq!(tiling.shapes.len(), 16);

    }

    #[test]
    fn orientation_lands_in_cyclic_range() {

        // the seed short leg points straight up and the frame is
        // left-handed, so the orientation lands half a turn later
        let seed = RepTile::pinwheel().unwrap();
        assert_eq!(seed.orientation_sign(), -1.0);
        assert!(close(seed.orientation(), 1.5 * PI));

        let seed = RepTile::sphinx().unwrap();
        assert!(close(seed.orientation(), PI / 3.0 + PI));

        let mut tiling = Tiling::seed(RepTile::pinwheel().unwrap());
        tiling.subdivide().unwrap();
        tiling.subdivide().unwrap();

        for shape in &tiling.shapes {
            let orientation = shape.orientation();
            assert!(orientation >= 0.0 && orientation < 2.0 * PI);
        }

    }

    #[test]
    fn perimeters_are_closed() {

        let pinwheel = RepTile::pinwheel().unwrap().perimeter();
        assert_eq!(pinwheel.len(), 4);
        assert_eq!(pinwheel[0], pinwheel[3]);

        let sphinx = RepTile::sphinx().unwrap().perimeter();
        assert_eq!(sphinx.len(), 6);
        assert_eq!(sphinx[0], sphinx[5]);

    }

    #[test]
    fn bounding_extents_cover_perimeter() {

        let seed = RepTile::sphinx().unwrap();

        assert!(close(seed.max_real(), 6.0));
        assert!(close(seed.max_imag(), 2.0 * SQRT3));

    }

    #[test]
    fn degenerate_shapes_rejected() {

        let zero = Point2d::new(0.0, 0.0);

        // zero-length legs
        assert!(Pinwheel::new(zero, zero, Point2d::new(0.0, 1.0)).is_err());
        assert!(Pinwheel::new(zero, Point2d::new(2.0, 0.0), zero).is_err());
        assert!(Sphinx::new(zero, zero, zero).is_err());

        // collinear frame
        assert!(Pinwheel::new(zero,
                              Point2d::new(2.0, 0.0),
                              Point2d::new(1.0, 0.0)).is_err());

    }

    #[test]
    fn config_rejects_zero_iterations() {
        assert!(Config::from_args(&to_args(&["pinwheel", "0"])).is_err());
    }

    #[test]
    fn config_rejects_unknown_family() {
        assert!(Config::from_args(&to_args(&["hexagon", "3"])).is_err());
    }

    #[test]
    fn config_rejects_unparsable_iterations() {
        assert!(Config::from_args(&to_args(&["sphinx", "lots"])).is_err());
        assert!(Config::from_args(&to_args(&["sphinx", "-3"])).is_err());
    }

    #[test]
    fn config_parses_output_and_rectangle() {

        let config = Config::from_args(
            &to_args(&["sphinx", "4", "out.png", "--rectangle"])).unwrap();

        assert_eq!(config.family, "sphinx");
        assert_eq!(config.iterations, 4);
        assert_eq!(config.render.output, "out.png");
        assert!(config.render.as_rectangle);

        let config = Config::from_args(&to_args(&["pinwheel", "2"])).unwrap();

        assert_eq!(config.render.output, DEFAULT_OUTPUT);
        assert!(!config.render.as_rectangle);

    }

    #[test]
    fn colormap_stays_off_background() {

        let cmap = build_colormap(CMAP_RESOLUTION);

        assert_eq!(cmap.len(), CMAP_RESOLUTION);

        for color in &cmap {
            for i in 0..3 {
                assert!(color[i] > 0.0 && color[i] < 1.0);
            }
        }

        assert_eq!(color_index(0.0, CMAP_RESOLUTION), 0);
        assert_eq!(color_index(2.0 * PI - 1e-9, CMAP_RESOLUTION),
                   CMAP_RESOLUTION - 1);

    }

    #[test]
    fn trim_border_crops_to_content() {

        let mut img = image::RgbImage::from_pixel(8, 8, image::Rgb(BACKGROUND));

        for y in 3..6 {
            for x in 2..5 {
                img.put_pixel(x, y, image::Rgb([200, 0, 0]));
            }
        }

        let trimmed = trim_border(img, BACKGROUND);

        assert_eq!(trimmed.dimensions(), (3, 3));
        assert_eq!(*trimmed.get_pixel(0, 0), image::Rgb([200, 0, 0]));

    }

    #[test]
    fn trim_border_keeps_blank_image() {

        let img = image::RgbImage::from_pixel(4, 4, image::Rgb(BACKGROUND));

        let trimmed = trim_border(img, BACKGROUND);

        assert_eq!(trimmed.dimensions(), (4, 4));

    }

    #[test]
    fn rectangle_doubling_fills_background() {

        let mut img = image::RgbImage::from_pixel(2, 2, image::Rgb(BACKGROUND));
        img.put_pixel(0, 0, image::Rgb([0, 0, 200]));

        let doubled = complete_rectangle(img, BACKGROUND);

        assert_eq!(*doubled.get_pixel(0, 0), image::Rgb([0, 0, 200]));
        assert_eq!(*doubled.get_pixel(1, 1), image::Rgb([0, 0, 200]));
        assert_eq!(*doubled.get_pixel(1, 0), image::Rgb(BACKGROUND));
        assert_eq!(*doubled.get_pixel(0, 1), image::Rgb(BACKGROUND));

    }

    #[test]
    fn rendered_image_is_trimmed_tight() {

        let mut tiling = Tiling::seed(RepTile::pinwheel().unwrap());
        tiling.subdivide().unwrap();

        let path = std::env::temp_dir().join("reptile_rs_trim_test.png");

        let config = RenderConfig {
            canvas: 256,
            cmap_resolution: CMAP_RESOLUTION,
            background: BACKGROUND,
            as_rectangle: false,
            output: path.to_str().unwrap().to_string()
        };

        render(&tiling.shapes, &config).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        let bg = image::Rgb(BACKGROUND);

        let (width, height) = img.dimensions();

        assert!((0..width).any(|x| *img.get_pixel(x, 0) != bg));
        assert!((0..width).any(|x| *img.get_pixel(x, height - 1) != bg));
        assert!((0..height).any(|y| *img.get_pixel(0, y) != bg));
        assert!((0..height).any(|y| *img.get_pixel(width - 1, y) != bg));

    }

}
