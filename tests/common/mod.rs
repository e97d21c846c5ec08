use std::cell::RefCell;

use xrandr_screens::display::{CommandExecutor, ExecError};

/// Captured `xrandr` output of a laptop with an external monitor attached
pub const QUERY_OUTPUT: &str = "\
Screen 0: minimum 8 x 8, current 3840 x 1080, maximum 32767 x 32767
eDP1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 344mm x 194mm
   1920x1080     60.02*+  59.93    47.99
   1680x1050     59.95    59.88
   1280x1024     60.02
   1024x768      60.00
DP1 disconnected (normal left inverted right x axis y axis)
HDMI1 connected 1920x1080+1920+0 left (normal left inverted right x axis y axis) 509mm x 286mm
   1920x1080     60.00 +  50.00    59.94
   1280x1024     60.02*   75.02
   1024x768      60.00
VGA1 disconnected (normal left inverted right x axis y axis)
VIRTUAL1 disconnected (normal left inverted right x axis y axis)
";

/// Captured `xrandr --verbose` output for the same setup, trimmed
pub const VERBOSE_OUTPUT: &str = "\
Screen 0: minimum 8 x 8, current 3840 x 1080, maximum 32767 x 32767
eDP1 connected primary 1920x1080+0+0 (0x48) normal (normal left inverted right x axis y axis) 344mm x 194mm
\tIdentifier: 0x42
\tTimestamp:  21350
\tSubpixel:   unknown
\tGamma:      1.0:1.0:1.0
\tBrightness: 1.00
\tClones:    
\tCRTC:       0
\tEDID: 
\t\t00ffffffffffff0006af3d2700000000
\t\t001a0104a51f1178028d15a156529d28
  1920x1080 (0x48) 141.000MHz -HSync -VSync *current +preferred
        h: width  1920 start 1936 end 1952 total 2104 skew    0 clock  67.02KHz
        v: height 1080 start 1083 end 1097 total 1116           clock  60.05Hz
DP1 disconnected (normal left inverted right x axis y axis)
\tIdentifier: 0x43
\tTimestamp:  21350
HDMI1 connected 1920x1080+1920+0 (0x4a) left (normal left inverted right x axis y axis) 509mm x 286mm
\tIdentifier: 0x44
\tGamma:      1.0:0.9:0.8
\tBrightness: 0.70
\tCRTC:       1
VGA1 disconnected (normal left inverted right x axis y axis)
\tIdentifier: 0x45
VIRTUAL1 disconnected (normal left inverted right x axis y axis)
\tIdentifier: 0x46
";

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Replays captured output and records every call
#[derive(Default)]
pub struct ReplayExecutor {
    pub calls: RefCell<Vec<Vec<String>>>,
    pub fail_all: bool,
}

impl ReplayExecutor {
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    pub fn applied(&self) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|args| args.first().is_some_and(|a| a == "--output"))
            .cloned()
            .collect()
    }
}

impl CommandExecutor for ReplayExecutor {
    fn execute(&self, args: &[String]) -> Result<Vec<String>, ExecError> {
        self.calls.borrow_mut().push(args.to_vec());
        if self.fail_all {
            return Err(ExecError::Failed {
                program: "xrandr".to_string(),
                status: Some(1),
                output: "Can't open display".to_string(),
            });
        }
        Ok(match args.first().map(String::as_str) {
            None => lines(QUERY_OUTPUT),
            Some("--verbose") => lines(VERBOSE_OUTPUT),
            Some(_) => Vec::new(),
        })
    }
}
