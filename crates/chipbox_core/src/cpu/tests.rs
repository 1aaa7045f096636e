use super::*;
use crate::{FONT_ADDRESS, RAM_SIZE, SCREEN_WIDTH, STACK_SIZE};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cpu_with_quirks(quirks: Quirks, rom: &[u8]) -> Cpu {
    init_logger();
    let mut cpu = Cpu::new(quirks, Timers::default()).with_seed(0x5EED);
    cpu.load_rom(rom).unwrap();
    cpu
}

fn cpu_with(rom: &[u8]) -> Cpu {
    cpu_with_quirks(Quirks::default(), rom)
}

fn run(cpu: &mut Cpu, steps: usize) {
    for _ in 0..steps {
        cpu.step().unwrap();
    }
}

/// Execute a single instruction word against an already prepared machine.
fn exec(cpu: &mut Cpu, op: u16) -> Result<()> {
    let instruction = Instruction::decode(op)?;
    cpu.execute(instruction)
}

#[test]
fn fetch_advances_pc_by_two() {
    let mut cpu = cpu_with(&[0x60, 0x01, 0x61, 0x02]);
    assert_eq!(cpu.step(), Ok(Step::Executed(Instruction::LoadImm { x: 0, nn: 1 })));
    assert_eq!(cpu.pc(), 0x202);
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x204);
    assert_eq!(cpu.v(1), 2);
}

#[test]
fn draw_font_zero_scenario() {
    // CLS; V0 = 5; I = font base; DRW V0, V1, 5 at (5, 0)
    let mut cpu = cpu_with(&[0x00, 0xE0, 0x60, 0x05, 0xA0, 0x50, 0xD0, 0x15]);
    run(&mut cpu, 4);

    assert_eq!(cpu.v(0xF), 0);
    let glyph = &crate::FONTSET[..5];
    let display = cpu.display();
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8 {
            let expected = (bits >> (7 - col)) & 1 == 1;
            assert_eq!(display.pixel(5 + col, row), expected, "({}, {})", 5 + col, row);
        }
    }
    let lit = display.pixels().iter().filter(|p| **p).count();
    let expected_lit: u32 = glyph.iter().map(|b| b.count_ones()).sum();
    assert_eq!(lit, expected_lit as usize);
}

#[test]
fn draw_at_row_five_when_vy_is_five() {
    // V0 = 0, V1 = 5; I = font base; DRW V0, V1, 5
    let mut cpu = cpu_with(&[0x60, 0x00, 0x61, 0x05, 0xA0, 0x50, 0xD0, 0x15]);
    run(&mut cpu, 4);
    assert_eq!(cpu.v(0xF), 0);
    // Glyph '0' top row is 0xF0.
    for col in 0..4 {
        assert!(cpu.display().pixel(col, 5));
    }
    assert!(!cpu.display().pixel(0, 4));
    assert!(cpu.display().pixel(0, 9));
    assert!(!cpu.display().pixel(1, 6));
}

#[test]
fn drawing_twice_collides_and_erases() {
    let mut cpu = cpu_with(&[0xA0, 0x50, 0xD0, 0x05, 0xD0, 0x05]);
    run(&mut cpu, 2);
    assert_eq!(cpu.v(0xF), 0);
    cpu.step().unwrap();
    assert_eq!(cpu.v(0xF), 1);
    assert!(cpu.display().pixels().iter().all(|p| !*p));
}

#[test]
fn clear_then_redraw_reproduces_the_sprite() {
    let mut cpu = cpu_with(&[0xA0, 0x5A, 0xD0, 0x05, 0x00, 0xE0, 0xD0, 0x05]);
    run(&mut cpu, 2);
    let first = *cpu.display().pixels();
    cpu.step().unwrap();
    assert!(cpu.display().pixels().iter().all(|p| !*p));
    cpu.step().unwrap();
    assert_eq!(cpu.display().pixels(), &first);
    assert_eq!(cpu.v(0xF), 0);
}

#[test]
fn add_immediate_wraps_without_touching_vf() {
    let mut cpu = cpu_with(&[0x6F, 0x07, 0x60, 0xFF, 0x70, 0x01]);
    run(&mut cpu, 3);
    assert_eq!(cpu.v(0), 0);
    assert_eq!(cpu.v(0xF), 7);
}

#[test]
fn call_and_return_restore_pc_and_depth() {
    let mut rom = vec![0u8; 0x60];
    rom[0..2].copy_from_slice(&[0x22, 0x50]);
    rom[0x50..0x52].copy_from_slice(&[0x00, 0xEE]);
    let mut cpu = cpu_with(&rom);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x250);
    assert_eq!(cpu.stack().depth(), 1);
    assert_eq!(cpu.stack().entries(), &[0x202]);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x202);
    assert_eq!(cpu.stack().depth(), 0);
}

#[test]
fn return_with_empty_stack_underflows() {
    let mut cpu = cpu_with(&[0x00, 0xEE]);
    assert_eq!(cpu.step(), Err(Chip8Error::StackUnderflow));
}

#[test]
fn recursion_past_stack_capacity_overflows() {
    // 0x200: CALL 0x200, forever.
    let mut cpu = cpu_with(&[0x22, 0x00]);
    run(&mut cpu, STACK_SIZE);
    assert_eq!(
        cpu.step(),
        Err(Chip8Error::StackOverflow { addr: 0x202 })
    );
}

#[test]
fn jumps_set_pc() {
    let mut cpu = cpu_with(&[0x13, 0x45]);
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x345);

    let mut cpu = cpu_with(&[0x60, 0x10, 0xB3, 0x00]);
    run(&mut cpu, 2);
    assert_eq!(cpu.pc(), 0x310);
}

#[test]
fn conditional_skips() {
    let mut cpu = cpu_with(&[]);
    cpu.v_reg[1] = 0x42;
    cpu.v_reg[2] = 0x42;
    cpu.v_reg[3] = 0x07;

    let cases: [(u16, bool); 8] = [
        (0x3142, true),
        (0x3143, false),
        (0x4142, false),
        (0x4143, true),
        (0x5120, true),
        (0x5130, false),
        (0x9120, false),
        (0x9130, true),
    ];
    for (op, skips) in cases {
        cpu.pc = 0x300;
        exec(&mut cpu, op).unwrap();
        let expected = if skips { 0x302 } else { 0x300 };
        assert_eq!(cpu.pc, expected, "{op:04X}");
    }
}

#[test]
fn add_with_carry_matches_arithmetic_for_all_bytes() {
    let mut cpu = cpu_with(&[]);
    for a in 0..=255u8 {
        for b in (0..=255u8).step_by(7) {
            cpu.v_reg[1] = a;
            cpu.v_reg[2] = b;
            exec(&mut cpu, 0x8124).unwrap();
            let sum = a as u16 + b as u16;
            assert_eq!(cpu.v_reg[1] as u16, sum % 256);
            assert_eq!(cpu.v_reg[0xF], (sum > 255) as u8, "{a} + {b}");
        }
    }
}

#[test]
fn subtraction_flags_in_both_directions() {
    let mut cpu = cpu_with(&[]);
    for (a, b) in [(5u8, 3u8), (3, 5), (9, 9), (0, 255), (255, 0)] {
        cpu.v_reg[1] = a;
        cpu.v_reg[2] = b;
        exec(&mut cpu, 0x8125).unwrap();
        assert_eq!(cpu.v_reg[1], a.wrapping_sub(b));
        assert_eq!(cpu.v_reg[0xF], (a >= b) as u8, "{a} - {b}");

        cpu.v_reg[1] = a;
        cpu.v_reg[2] = b;
        exec(&mut cpu, 0x8127).unwrap();
        assert_eq!(cpu.v_reg[1], b.wrapping_sub(a));
        assert_eq!(cpu.v_reg[0xF], (b >= a) as u8, "{b} - {a}");
    }
}

#[test]
fn flag_write_wins_when_destination_is_vf() {
    let mut cpu = cpu_with(&[]);
    cpu.v_reg[0xF] = 0xFF;
    cpu.v_reg[1] = 0x01;
    // VF += V1 overflows: result 0, then the carry flag 1 overwrites it.
    exec(&mut cpu, 0x8F14).unwrap();
    assert_eq!(cpu.v_reg[0xF], 1);

    cpu.v_reg[0xF] = 0x02;
    exec(&mut cpu, 0x8F06).unwrap();
    assert_eq!(cpu.v_reg[0xF], 0);
}

#[test]
fn logic_ops_respect_vf_reset_quirk() {
    for (quirks, expected_vf) in [(Quirks::modern(), 0xAA), (Quirks::cosmac_vip(), 0x00)] {
        let mut cpu = cpu_with_quirks(quirks, &[]);
        for (op, expected) in [(0x8121u16, 0b1110), (0x8122, 0b1000), (0x8123, 0b0110)] {
            cpu.v_reg[1] = 0b1100;
            cpu.v_reg[2] = 0b1010;
            cpu.v_reg[0xF] = 0xAA;
            exec(&mut cpu, op).unwrap();
            assert_eq!(cpu.v_reg[1], expected, "{op:04X}");
            assert_eq!(cpu.v_reg[0xF], expected_vf, "{op:04X}");
        }
    }
}

#[test]
fn shifts_operate_in_place_by_default() {
    let mut cpu = cpu_with(&[]);
    cpu.v_reg[1] = 0b1000_0011;
    cpu.v_reg[2] = 0xFF;
    exec(&mut cpu, 0x8126).unwrap();
    assert_eq!(cpu.v_reg[1], 0b0100_0001);
    assert_eq!(cpu.v_reg[0xF], 1);

    cpu.v_reg[1] = 0b1000_0010;
    exec(&mut cpu, 0x812E).unwrap();
    assert_eq!(cpu.v_reg[1], 0b0000_0100);
    assert_eq!(cpu.v_reg[0xF], 1);
    assert_eq!(cpu.v_reg[2], 0xFF);
}

#[test]
fn shifts_read_vy_with_quirk() {
    let quirks = Quirks::builder().shift_uses_vy(true).build();
    let mut cpu = cpu_with_quirks(quirks, &[]);
    cpu.v_reg[1] = 0xFF;
    cpu.v_reg[2] = 0b0000_0010;
    exec(&mut cpu, 0x8126).unwrap();
    assert_eq!(cpu.v_reg[1], 0b0000_0001);
    assert_eq!(cpu.v_reg[0xF], 0);

    cpu.v_reg[2] = 0b0100_0000;
    exec(&mut cpu, 0x812E).unwrap();
    assert_eq!(cpu.v_reg[1], 0b1000_0000);
    assert_eq!(cpu.v_reg[0xF], 0);
}

#[test]
fn add_index_overflow_flag_is_a_quirk() {
    let mut cpu = cpu_with(&[]);
    cpu.i_reg = 0x0FFF;
    cpu.v_reg[1] = 2;
    cpu.v_reg[0xF] = 9;
    exec(&mut cpu, 0xF11E).unwrap();
    assert_eq!(cpu.i_reg, 0x1001);
    assert_eq!(cpu.v_reg[0xF], 9);

    let quirks = Quirks::builder().index_overflow_sets_vf(true).build();
    let mut cpu = cpu_with_quirks(quirks, &[]);
    cpu.i_reg = 0x0FFF;
    cpu.v_reg[1] = 2;
    exec(&mut cpu, 0xF11E).unwrap();
    assert_eq!(cpu.v_reg[0xF], 1);
    cpu.i_reg = 0x0100;
    exec(&mut cpu, 0xF11E).unwrap();
    assert_eq!(cpu.i_reg, 0x0102);
    assert_eq!(cpu.v_reg[0xF], 0);
}

#[test]
fn font_address_uses_low_nibble() {
    let mut cpu = cpu_with(&[]);
    for digit in 0..16u8 {
        cpu.v_reg[3] = digit | 0xA0;
        exec(&mut cpu, 0xF329).unwrap();
        assert_eq!(cpu.i_reg, FONT_ADDRESS + digit as u16 * 5);
    }
}

#[test]
fn bcd_writes_three_digits() {
    let mut cpu = cpu_with(&[]);
    cpu.i_reg = 0x300;
    for (value, digits) in [(254u8, [2, 5, 4]), (7, [0, 0, 7]), (100, [1, 0, 0])] {
        cpu.v_reg[4] = value;
        exec(&mut cpu, 0xF433).unwrap();
        assert_eq!(cpu.memory.slice(0x300, 3).unwrap(), &digits);
    }
}

#[test]
fn bcd_past_end_of_memory_fails_without_writing() {
    let mut cpu = cpu_with(&[]);
    cpu.i_reg = (RAM_SIZE - 2) as u16;
    cpu.v_reg[0] = 123;
    assert_eq!(
        exec(&mut cpu, 0xF033),
        Err(Chip8Error::AddressOutOfRange { addr: RAM_SIZE })
    );
    assert_eq!(cpu.memory.slice(RAM_SIZE - 2, 2).unwrap(), &[0, 0]);
}

#[test]
fn store_and_load_registers_round_trip() {
    let mut cpu = cpu_with(&[]);
    cpu.i_reg = 0x400;
    for i in 0..16 {
        cpu.v_reg[i] = (i as u8) * 3 + 1;
    }
    exec(&mut cpu, 0xF355).unwrap();
    assert_eq!(cpu.memory.slice(0x400, 5).unwrap(), &[1, 4, 7, 10, 0]);
    assert_eq!(cpu.i_reg, 0x400);

    cpu.v_reg = [0; 16];
    exec(&mut cpu, 0xF265).unwrap();
    assert_eq!(&cpu.v_reg[..4], &[1, 4, 7, 0]);
    assert_eq!(cpu.i_reg, 0x400);
}

#[test]
fn block_transfer_increments_index_with_quirk() {
    let quirks = Quirks::builder().load_store_increments_index(true).build();
    let mut cpu = cpu_with_quirks(quirks, &[]);
    cpu.i_reg = 0x400;
    exec(&mut cpu, 0xF355).unwrap();
    assert_eq!(cpu.i_reg, 0x404);
    exec(&mut cpu, 0xF065).unwrap();
    assert_eq!(cpu.i_reg, 0x405);
}

#[test]
fn block_transfer_out_of_range_is_fatal() {
    let mut cpu = cpu_with(&[]);
    cpu.i_reg = (RAM_SIZE - 4) as u16;
    cpu.v_reg = [0x11; 16];
    assert!(matches!(
        exec(&mut cpu, 0xF755),
        Err(Chip8Error::AddressOutOfRange { .. })
    ));
    assert_eq!(cpu.memory.slice(RAM_SIZE - 4, 4).unwrap(), &[0; 4]);
    assert!(exec(&mut cpu, 0xF765).is_err());
    assert!(exec(&mut cpu, 0xF355).is_ok());
}

#[test]
fn random_is_masked_and_reproducible_with_seed() {
    let mut a = cpu_with(&[]);
    let mut b = cpu_with(&[]);
    for _ in 0..32 {
        exec(&mut a, 0xC10F).unwrap();
        exec(&mut b, 0xC10F).unwrap();
        assert_eq!(a.v_reg[1], b.v_reg[1]);
        assert_eq!(a.v_reg[1] & 0xF0, 0);
    }
    exec(&mut a, 0xC100).unwrap();
    assert_eq!(a.v_reg[1], 0);
}

#[test]
fn timer_instructions_go_through_shared_handle() {
    let mut cpu = cpu_with(&[0x60, 0x2A, 0xF0, 0x15, 0xF0, 0x18, 0xF1, 0x07]);
    run(&mut cpu, 3);
    assert_eq!(cpu.timers().delay(), 0x2A);
    assert_eq!(cpu.timers().sound(), 0x2A);
    assert!(cpu.timers().sound_active());
    cpu.timers().tick();
    cpu.step().unwrap();
    assert_eq!(cpu.v(1), 0x29);
}

#[test]
fn key_skips() {
    let mut cpu = cpu_with(&[]);
    cpu.v_reg[2] = 0xB;
    cpu.pc = 0x300;
    exec(&mut cpu, 0xE29E).unwrap();
    assert_eq!(cpu.pc, 0x300);
    exec(&mut cpu, 0xE2A1).unwrap();
    assert_eq!(cpu.pc, 0x302);

    cpu.set_key(0xB, true);
    exec(&mut cpu, 0xE29E).unwrap();
    assert_eq!(cpu.pc, 0x304);
    exec(&mut cpu, 0xE2A1).unwrap();
    assert_eq!(cpu.pc, 0x304);
}

#[test]
fn wait_key_blocks_until_press_and_release() {
    // LD V5, K; then LD V0, 0x01
    let mut cpu = cpu_with(&[0xF5, 0x0A, 0x60, 0x01]);

    for _ in 0..5 {
        assert_eq!(cpu.step(), Ok(Step::WaitingForKey));
        assert_eq!(cpu.pc(), 0x200);
    }

    cpu.set_key(0x7, true);
    assert_eq!(cpu.step(), Ok(Step::WaitingForKey));
    assert_eq!(cpu.pc(), 0x200);
    assert_eq!(cpu.v(5), 0x7);
    assert!(cpu.is_waiting_for_key());

    // Still held: keep waiting, even if another key joins in.
    cpu.set_key(0x2, true);
    assert_eq!(cpu.step(), Ok(Step::WaitingForKey));
    assert_eq!(cpu.pc(), 0x200);
    assert_eq!(cpu.v(5), 0x7);

    cpu.set_key(0x7, false);
    assert_eq!(
        cpu.step(),
        Ok(Step::Executed(Instruction::WaitKey { x: 5 }))
    );
    assert_eq!(cpu.pc(), 0x202);
    assert!(!cpu.is_waiting_for_key());

    cpu.step().unwrap();
    assert_eq!(cpu.v(0), 1);
}

#[test]
fn unrecognized_opcode_is_skipped_without_side_effects() {
    let mut cpu = cpu_with(&[0xF0, 0xFF, 0x60, 0x09]);
    let before = cpu.v_reg;
    assert_eq!(cpu.step(), Ok(Step::Unrecognized(0xF0FF)));
    assert_eq!(cpu.v_reg, before);
    assert_eq!(cpu.pc(), 0x202);
    cpu.step().unwrap();
    assert_eq!(cpu.v(0), 9);
}

#[test]
fn sys_is_ignored() {
    let mut cpu = cpu_with(&[0x01, 0x23]);
    assert_eq!(
        cpu.step(),
        Ok(Step::Executed(Instruction::Sys { nnn: 0x123 }))
    );
    assert_eq!(cpu.pc(), 0x202);
}

#[test]
fn fetch_past_end_of_memory_is_an_error() {
    let mut cpu = cpu_with(&[0x1F, 0xFF]);
    cpu.step().unwrap();
    assert_eq!(
        cpu.step(),
        Err(Chip8Error::AddressOutOfRange { addr: RAM_SIZE })
    );
}

#[test]
fn sprite_clips_by_default_and_wraps_with_quirk() {
    // V0 = 62, V1 = 0; I = font '0'; DRW V0, V1, 1 (top row 0xF0)
    let rom = [0x60, 62, 0x61, 0x00, 0xA0, 0x50, 0xD0, 0x11];

    let mut cpu = cpu_with(&rom);
    run(&mut cpu, 4);
    assert!(cpu.display().pixel(62, 0) && cpu.display().pixel(63, 0));
    assert!(!cpu.display().pixel(0, 0));

    let quirks = Quirks::builder().wrap_sprites(true).build();
    let mut cpu = cpu_with_quirks(quirks, &rom);
    run(&mut cpu, 4);
    assert!(cpu.display().pixel(0, 0) && cpu.display().pixel(1, 0));
    assert!(!cpu.display().pixel(2, 0));
}

#[test]
fn inclusive_sprite_height_draws_one_extra_row() {
    // I = font '0'; DRW V0, V0, 4
    let rom = [0xA0, 0x50, 0xD0, 0x04];

    let mut cpu = cpu_with(&rom);
    run(&mut cpu, 2);
    assert!(!cpu.display().pixel(0, 4));

    let quirks = Quirks::builder().inclusive_sprite_height(true).build();
    let mut cpu = cpu_with_quirks(quirks, &rom);
    run(&mut cpu, 2);
    assert!(cpu.display().pixel(0, 4));
}

#[test]
fn draw_records_dirty_region() {
    let mut cpu = cpu_with(&[0xA0, 0x50, 0xD0, 0x05]);
    run(&mut cpu, 2);
    let display = cpu.display_mut();
    assert!(display.has_changes());
    let changes = display.take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!((changes[0].x, changes[0].y), (0, 0));
    assert_eq!((changes[0].width, changes[0].height), (4, 5));
    assert!(!cpu.display().has_changes());
    assert!(SCREEN_WIDTH > changes[0].width);
}

#[test]
fn dump_lists_registers_stack_and_next_instruction() {
    let mut cpu = cpu_with(&[0x22, 0x04, 0x00, 0x00, 0x6A, 0x3C]);
    cpu.step().unwrap();
    cpu.set_key(0xE, true);
    let text = cpu.dump().to_string();
    assert!(text.contains("PC: 0x204"), "{text}");
    assert!(text.contains("LD VA, 0x3C"), "{text}");
    assert!(text.contains("Stack (1/16)"), "{text}");
    assert!(text.contains("0x202"), "{text}");
    assert!(text.contains("Keys: E"), "{text}");
}
