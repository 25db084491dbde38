use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera Index (default 0)
    #[arg(short, long, default_value_t = 0)]
    pub cam_index: u32,

    /// Product category to try on (jewelry, shoes, clothes, furniture)
    #[arg(long, default_value = "jewelry")]
    pub category: String,

    /// Product name; substrings like "earring" or "necklace" refine placement
    #[arg(long, default_value = "Pearl Necklace")]
    pub product: String,

    /// Mirror the camera output
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    /// Run without a camera, on a synthetic still frame
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// List available cameras
    #[arg(long)]
    pub list: bool,
}
