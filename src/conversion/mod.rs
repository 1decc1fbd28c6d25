/*!
 * Offline conversion of voiceover tables into loadable collections.
 *
 * - `tabular`: CSV reading into loosely typed rows
 * - `converter`: rows to `VoiceoverCollection`, persisted as JSON
 */

pub use self::converter::RecordConverter;
pub use self::tabular::{Cell, TableRow};

pub mod converter;
pub mod tabular;
