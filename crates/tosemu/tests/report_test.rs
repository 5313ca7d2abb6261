use kernel::trap::{Dispatcher, TRAP_GEMDOS, TRAP_XBIOS};
use kernel::{KernelConfig, Machine};
use tosemu::report;
use types::exec::EXEC_MAGIC;
use types::AccessFlags;
use vm::host_interface::BufferedHost;

fn tiny_program() -> Vec<u8> {
    let mut bytes = EXEC_MAGIC.to_be_bytes().to_vec();
    for value in [4u32, 0, 0x10, 0, 0, 0] {
        bytes.extend_from_slice(&value.to_be_bytes());
    }
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&[0x4E, 0x71, 0x4E, 0x75]);
    bytes
}

fn loaded() -> (Machine<BufferedHost>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut machine =
        Machine::new(KernelConfig::new(dir.path()), BufferedHost::new()).unwrap();
    machine.load(&tiny_program(), &["-x", "FILE.TXT"]).unwrap();
    (machine, dir)
}

#[test]
fn test_describe_flags() {
    assert_eq!(report::describe_flags(AccessFlags::USER_RW), "U:rw S:rw");
    assert_eq!(report::describe_flags(AccessFlags::SUPER_READ), "U:-- S:r-");
    assert_eq!(report::describe_flags(AccessFlags::empty()), "U:-- S:--");
}

#[test]
fn test_image_report() {
    println!("=== Testing image report ===");
    let (machine, _dir) = loaded();
    let image = machine.image().unwrap();

    let header = report::header_lines(image);
    assert_eq!(header[0], "magic      0x601a");
    assert_eq!(header[1], "text       0x00000004");
    assert_eq!(header[3], "bss        0x00000010");
    assert!(header[6].contains("0 fixups applied"));

    let basepage = report::basepage_lines(image);
    assert_eq!(basepage[2], "p_tbase    0x00000900");
    assert_eq!(basepage.last().unwrap(), "p_cmdlin   \"-x FILE.TXT\"");
    println!("✓ header and basepage");

    let map = report::memory_map_lines(machine.space());
    assert_eq!(map.len(), 6);
    assert_eq!(map[1], "0x000200..0x000204  U:-- S:r-  supexec return");
    assert!(map.last().unwrap().ends_with("user ram"));
    println!("✓ memory map");

    let heap = report::heap_line(image);
    assert!(heap.starts_with(&format!("heap 0x{:06x}..", image.heap.floor)));
    assert!(heap.contains(&format!("user stack at 0x{:06x}", image.user_stack())));
}

#[test]
fn test_call_listing() {
    let dispatcher = Dispatcher::new(false);
    let gemdos = report::call_lines(dispatcher.table(TRAP_GEMDOS).unwrap());

    let cconws = gemdos.iter().find(|line| line.contains("Cconws")).unwrap();
    assert!(cconws.starts_with("0x009"));
    assert!(cconws.ends_with("implemented"));
    let pexec = gemdos.iter().find(|line| line.contains("Pexec")).unwrap();
    assert!(pexec.starts_with("0x04b"));
    assert!(pexec.ends_with("halts"));

    // Sorted by function code.
    let codes: Vec<_> = gemdos.iter().map(|line| line[..5].to_string()).collect();
    let mut sorted = codes.clone();
    sorted.sort();
    assert_eq!(codes, sorted);

    let xbios = report::call_lines(dispatcher.table(TRAP_XBIOS).unwrap());
    assert!(xbios
        .iter()
        .any(|line| line.contains("Supexec") && line.ends_with("implemented")));
}
