/// Client-side media processing
///
/// This module handles:
/// - Decoding queued files into preview thumbnails
/// - Decoding downloaded gallery images into grid thumbnails
/// - The simulated per-file upload timer

pub mod preview;
pub mod timing;
