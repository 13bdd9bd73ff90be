use bledom_bridge::*;
use std::{env, io};

/// Line protocol daemon for hub integration: a home-automation bridge spawns
/// this process, writes one command per line to stdin and reads `OK`/`ERR`
/// replies (plus `STATE` lines) from stdout.
#[tokio::main]
async fn main() -> Result<()> {
    // Get a target id/mac address from command line arguments.
    // If not provided, scan by advertised name.
    let usage = "Usage: bledomd [id/mac address]";
    let args: Vec<_> = env::args().collect();
    if args.len() > 1 && (args[1] == "-h" || args[1] == "--help") {
        eprintln!("{usage}");
        std::process::exit(0);
    }

    // Initialize the device with the provided address, if any
    let transport = BleTransport::connect(args.get(1).map(String::as_str)).await?;
    let mut light = LedStripModel::new(transport);

    // Inform about successful initialization
    println!("OK");

    // Mainloop: wait for commands, line by line
    loop {
        let mut input: String = String::new();
        if io::stdin().read_line(&mut input).unwrap_or(0) == 0 {
            // EOF: the hub went away
            break;
        }

        let mut cmd = input.trim().split(':');
        let result = match cmd.next() {
            Some("power_on") => light.set_power(true).await,
            Some("power_off") => light.set_power(false).await,
            Some("set_brightness") => match cmd.next().map(|s| s.trim().parse::<u8>()) {
                Some(Ok(level)) => light.set_brightness(level).await,
                _ => {
                    eprintln!("ERR Invalid brightness. Use set_brightness:0-100");
                    continue;
                }
            },
            Some("set_hue") => match cmd.next().map(|s| s.trim().parse::<f64>()) {
                Some(Ok(degrees)) => light.set_hue(degrees).await,
                _ => {
                    eprintln!("ERR Invalid hue. Use set_hue:0-359");
                    continue;
                }
            },
            Some("set_saturation") => match cmd.next().map(|s| s.trim().parse::<u8>()) {
                Some(Ok(percent)) => light.set_saturation(percent).await,
                _ => {
                    eprintln!("ERR Invalid saturation. Use set_saturation:0-100");
                    continue;
                }
            },
            Some("set_rgb") => {
                let rgb: Vec<u8> = cmd
                    .next()
                    .unwrap_or("")
                    .split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect();
                if rgb.len() != 3 {
                    eprintln!("ERR Invalid color format. Use R,G,B (e.g., 255,0,0 for red)");
                    continue;
                }
                light.set_rgb(rgb[0], rgb[1], rgb[2]).await
            }
            Some("set_effect") => match cmd.next().map(|s| s.trim().parse::<Effect>()) {
                Some(Ok(effect)) => light.set_effect(effect).await,
                _ => {
                    eprintln!("ERR Unknown effect. Use set_effect:none|jump_rgb|jump_rgbycmw|crossfade_rgb|crossfade_rgbycmw|blink_rgbycmw");
                    continue;
                }
            },
            Some("set_effect_speed") => match cmd.next().map(|s| s.trim().parse::<u8>()) {
                Some(Ok(speed)) => light.set_effect_speed(speed).await,
                _ => {
                    eprintln!("ERR Invalid effect speed. Use set_effect_speed:0-100");
                    continue;
                }
            },
            Some("get_state") => {
                let state = light.state();
                println!(
                    "STATE power={} brightness={} hue={} saturation={} effect={} effect_speed={}",
                    state.power(),
                    state.brightness(),
                    state.hue(),
                    state.saturation(),
                    state.effect(),
                    state.effect_speed()
                );
                continue;
            }
            Some("") | None => {
                eprintln!("ERR No command given");
                continue;
            }
            Some(other) => {
                eprintln!("ERR Unknown command: {other}");
                continue;
            }
        };

        // Mirror the outcome back to the hub
        match result {
            Ok(()) => println!("OK"),
            Err(e) => eprintln!("ERR {e}"),
        }
    }

    Ok(())
}
